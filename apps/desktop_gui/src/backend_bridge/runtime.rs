//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{
    controller::LOAD_FAILED_ALERT, submit_config, trigger_execution, ConfigBackend, ConfigClient,
    UiEffect,
};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Starts the worker thread. Each command runs as its own task, so a slow
/// request never holds up the ones queued after it.
pub fn launch(server_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let client = match ConfigClient::new(&server_url) {
            Ok(client) => client,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: {err}"),
                )));
                tracing::error!("cannot use server url '{server_url}': {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Backend worker ready ({})",
                client.base_url()
            )));
            while let Ok(cmd) = cmd_rx.recv() {
                tokio::spawn(run_command(client.clone(), cmd, ui_tx.clone()));
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

async fn run_command(client: ConfigClient, cmd: BackendCommand, ui_tx: Sender<UiEvent>) {
    let event = match cmd {
        BackendCommand::SaveConfig { payload } => {
            tracing::info!(nodes = payload.node_count, "backend: save_config");
            UiEvent::Effect(submit_config(&client, &payload).await)
        }
        BackendCommand::ExecutePlatform => {
            tracing::info!("backend: execute_platform");
            match trigger_execution(&client).await {
                Some(effect) => UiEvent::Effect(effect),
                None => UiEvent::Info("Platform execution requested".to_string()),
            }
        }
        BackendCommand::LoadSavedConfig => {
            tracing::info!("backend: load_saved_config");
            match client.get_config().await {
                Ok(payload) => UiEvent::ConfigLoaded(payload),
                Err(err) => {
                    tracing::warn!("backend: load_saved_config failed: {err}");
                    UiEvent::Effect(UiEffect::Alert(LOAD_FAILED_ALERT.to_string()))
                }
            }
        }
        BackendCommand::FetchOutput { target } => {
            tracing::info!(target = %target, "backend: fetch_output");
            match client.get_output().await {
                Ok(text) => UiEvent::OutputLoaded { target, text },
                Err(err) => {
                    tracing::error!("backend: fetch_output failed: {err}");
                    UiEvent::Error(UiError::from_message(
                        UiErrorContext::Output,
                        err.to_string(),
                    ))
                }
            }
        }
    };
    forward_event(&ui_tx, event);
}

/// Hands a command result to the UI without blocking the worker. A full or
/// closed queue drops the event, which is logged.
fn forward_event(ui_tx: &Sender<UiEvent>, event: UiEvent) -> bool {
    match ui_tx.try_send(event) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!("backend: dropping ui event: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;

    #[test]
    fn forwarded_alert_reaches_ui_queue() {
        let (ui_tx, ui_rx) = bounded::<UiEvent>(1);

        assert!(forward_event(
            &ui_tx,
            UiEvent::Effect(UiEffect::Alert(LOAD_FAILED_ALERT.to_string()))
        ));

        match ui_rx.try_recv() {
            Ok(UiEvent::Effect(UiEffect::Alert(text))) => assert_eq!(text, LOAD_FAILED_ALERT),
            _ => panic!("expected forwarded alert"),
        }
    }

    #[test]
    fn full_ui_queue_drops_event_without_blocking() {
        let (ui_tx, ui_rx) = bounded::<UiEvent>(1);
        assert!(forward_event(&ui_tx, UiEvent::Info("first".to_string())));

        assert!(!forward_event(
            &ui_tx,
            UiEvent::Effect(UiEffect::Alert("Config file updated successfully!".to_string()))
        ));
        assert_eq!(ui_rx.len(), 1);
    }

    #[test]
    fn closed_ui_queue_drops_event() {
        let (ui_tx, ui_rx) = bounded::<UiEvent>(4);
        drop(ui_rx);

        assert!(!forward_event(&ui_tx, UiEvent::Info("late".to_string())));
    }
}
