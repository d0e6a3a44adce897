use std::collections::VecDeque;

use client_core::{ClientSettings, FormController, NodeForm, NodeSeed, UiEffect};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{ControllerKind, NodeKey};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub settings: ClientSettings,
}

/// Edits collected while drawing a frame and applied once it is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FormAction {
    AddNode,
    RemoveNode,
    AddController(NodeKey, ControllerKind),
    RemoveController(NodeKey, ControllerKind),
    Select {
        key: NodeKey,
        kind: ControllerKind,
        index: usize,
        value: Option<String>,
    },
    Save,
    Execute,
    LoadSaved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AppView {
    Form,
    Output {
        target: String,
        text: Option<String>,
    },
}

pub struct NodeConfigApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    server_url: String,
    controller: FormController,
    alerts: VecDeque<String>,
    view: AppView,
    status: String,
}

impl NodeConfigApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        let form = NodeForm::with_credentials(startup.settings.credentials());
        Self {
            cmd_tx,
            ui_rx,
            server_url: startup.settings.server_url,
            controller: FormController::new(form),
            alerts: VecDeque::new(),
            view: AppView::Form,
            status: "Ready".to_string(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Effect(effect) => self.apply_effect(effect),
                UiEvent::ConfigLoaded(payload) => {
                    self.controller.replace_with(&payload);
                    self.status =
                        format!("Loaded saved config with {} node(s)", payload.node_count);
                }
                UiEvent::OutputLoaded { target, text } => {
                    if let AppView::Output {
                        target: shown,
                        text: slot,
                    } = &mut self.view
                    {
                        if *shown == target {
                            *slot = Some(text);
                        }
                    }
                }
                UiEvent::Error(err) => {
                    tracing::warn!("ui error: {}", err.message());
                    self.status = err.summary();
                    match err.context() {
                        UiErrorContext::BackendStartup => self.alerts.push_back(err.summary()),
                        UiErrorContext::Output => {
                            if let AppView::Output { text, .. } = &mut self.view {
                                *text = Some(format!("Output unavailable: {}", err.message()));
                            }
                        }
                    }
                }
            }
        }
    }

    fn apply_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Alert(message) => self.alerts.push_back(message),
            UiEffect::Navigate(target) => {
                tracing::info!(target = %target, "navigating to output view");
                self.status = format!("Showing {target}");
                self.view = AppView::Output {
                    target: target.clone(),
                    text: None,
                };
                self.dispatch(BackendCommand::FetchOutput { target });
            }
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn apply_action(&mut self, action: FormAction) {
        let effect = match action {
            FormAction::AddNode => {
                self.controller.add_node_box(NodeSeed::default());
                None
            }
            FormAction::RemoveNode => self.controller.remove_node(),
            FormAction::AddController(key, kind) => self.controller.add_controller(key, kind),
            FormAction::RemoveController(key, kind) => self.controller.remove_controller(key, kind),
            FormAction::Select {
                key,
                kind,
                index,
                value,
            } => self
                .controller
                .select_controller(key, kind, index, value.as_deref()),
            FormAction::Save => {
                let payload = self.controller.save_payload();
                self.status = format!("Saving {} node(s)...", payload.node_count);
                self.dispatch(BackendCommand::SaveConfig { payload });
                None
            }
            FormAction::Execute => {
                self.status = "Executing platform script...".to_string();
                self.dispatch(BackendCommand::ExecutePlatform);
                None
            }
            FormAction::LoadSaved => {
                self.status = "Loading saved config...".to_string();
                self.dispatch(BackendCommand::LoadSavedConfig);
                None
            }
        };
        if let Some(effect) = effect {
            self.apply_effect(effect);
        }
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alerts.front().cloned() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Alert")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.alerts.pop_front();
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) -> Vec<FormAction> {
        let mut actions = Vec::new();
        let keys: Vec<NodeKey> = self
            .controller
            .form()
            .nodes()
            .iter()
            .map(|node| node.key())
            .collect();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for key in keys {
                    self.show_node_box(ui, key, &mut actions);
                    ui.add_space(8.0);
                }
            });
        actions
    }

    fn show_node_box(&mut self, ui: &mut egui::Ui, key: NodeKey, actions: &mut Vec<FormAction>) {
        let Ok(node) = self.controller.form_mut().node_mut(key) else {
            return;
        };
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label("Node ID:");
                ui.text_edit_singleline(&mut node.node_id);
            });
            ui.horizontal(|ui| {
                ui.label("Management IP:");
                ui.text_edit_singleline(&mut node.management_ip);
            });
            ui.strong("PCI Devices");
            for kind in ControllerKind::ALL {
                ui.horizontal(|ui| {
                    ui.label(format!("{kind} Controllers:"));
                    if ui.button(format!("+ Add {kind} Controller")).clicked() {
                        actions.push(FormAction::AddController(key, kind));
                    }
                    if ui.button(format!("- Remove {kind} Controller")).clicked() {
                        actions.push(FormAction::RemoveController(key, kind));
                    }
                });
                for (index, slot) in node.controllers(kind).iter().enumerate() {
                    let current = slot.selection().map(str::to_string);
                    let mut choice = current.clone();
                    let selected_text = current
                        .as_deref()
                        .map(|value| {
                            kind.find_option(value)
                                .map(|option| option.label)
                                .unwrap_or(value)
                        })
                        .unwrap_or(kind.placeholder())
                        .to_string();
                    egui::ComboBox::from_id_salt(("controller", key.0, kind, index))
                        .width(ui.available_width().min(560.0))
                        .selected_text(selected_text)
                        .show_ui(ui, |ui| {
                            for option in kind.catalog() {
                                ui.selectable_value(
                                    &mut choice,
                                    Some(option.value.to_string()),
                                    option.label,
                                );
                            }
                        });
                    if choice != current {
                        actions.push(FormAction::Select {
                            key,
                            kind,
                            index,
                            value: choice,
                        });
                    }
                }
            }
        });
    }

    fn show_output(&mut self, ctx: &egui::Context) {
        let AppView::Output { target, text } = &self.view else {
            return;
        };
        let mut back = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(format!("Output ({target})"));
            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| match text {
                Some(text) => {
                    ui.monospace(text.as_str());
                }
                None => {
                    ui.spinner();
                }
            });
            ui.separator();
            if ui.button("Back to form").clicked() {
                back = true;
            }
        });
        if back {
            self.view = AppView::Form;
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(&self.server_url);
                ui.separator();
                ui.small(&self.status);
            });
        });
    }

    fn show_form_view(&mut self, ctx: &egui::Context) {
        let blocked = !self.alerts.is_empty();
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("form_toolbar").show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Add Node").clicked() {
                        actions.push(FormAction::AddNode);
                    }
                    if ui.button("Remove Node").clicked() {
                        actions.push(FormAction::RemoveNode);
                    }
                    ui.separator();
                    if ui.button("Save").clicked() {
                        actions.push(FormAction::Save);
                    }
                    if ui.button("Execute").clicked() {
                        actions.push(FormAction::Execute);
                    }
                    ui.separator();
                    if ui.button("Load saved config").clicked() {
                        actions.push(FormAction::LoadSaved);
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                actions.extend(self.show_form(ui));
            });
        });

        for action in actions {
            self.apply_action(action);
        }
    }
}

impl eframe::App for NodeConfigApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_status_bar(ctx);
        match self.view {
            AppView::Form => self.show_form_view(ctx),
            AppView::Output { .. } => self.show_output(ctx),
        }
        self.show_alert(ctx);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use client_core::controller::SAVE_SUCCEEDED_ALERT;
    use crossbeam_channel::bounded;
    use shared::domain::ConfigPayload;

    use super::*;

    fn test_app() -> (NodeConfigApp, Receiver<BackendCommand>, Sender<UiEvent>) {
        let (cmd_tx, cmd_rx) = bounded(16);
        let (ui_tx, ui_rx) = bounded(16);
        let app = NodeConfigApp::new(
            cmd_tx,
            ui_rx,
            StartupConfig {
                settings: ClientSettings::default(),
            },
        );
        (app, cmd_rx, ui_tx)
    }

    #[test]
    fn refused_removal_queues_alert_and_keeps_node() {
        let (mut app, _cmd_rx, _ui_tx) = test_app();

        app.apply_action(FormAction::RemoveNode);

        assert_eq!(app.controller.form().len(), 1);
        assert_eq!(
            app.alerts.front().map(String::as_str),
            Some("At least one node is required!")
        );
    }

    #[test]
    fn save_sends_serialized_form_to_worker() {
        let (mut app, cmd_rx, _ui_tx) = test_app();
        app.apply_action(FormAction::AddNode);

        app.apply_action(FormAction::Save);

        match cmd_rx.try_recv().expect("queued command") {
            BackendCommand::SaveConfig { payload } => {
                assert_eq!(payload.node_count, 2);
                assert_eq!(payload.nodes[1].node_id, "2");
            }
            other => panic!("unexpected command {}", other.name()),
        }
    }

    #[test]
    fn navigation_switches_to_output_and_requests_it() {
        let (mut app, cmd_rx, ui_tx) = test_app();
        ui_tx
            .send(UiEvent::Effect(UiEffect::Navigate("/output".into())))
            .expect("send");

        app.process_ui_events();

        assert!(matches!(&app.view, AppView::Output { target, text: None } if target == "/output"));
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::FetchOutput { target }) if target == "/output"
        ));

        ui_tx
            .send(UiEvent::OutputLoaded {
                target: "/output".into(),
                text: "done".into(),
            })
            .expect("send");
        app.process_ui_events();
        assert!(matches!(&app.view, AppView::Output { text: Some(text), .. } if text == "done"));
    }

    #[test]
    fn alerts_are_shown_in_arrival_order() {
        let (mut app, _cmd_rx, ui_tx) = test_app();
        ui_tx
            .send(UiEvent::Effect(UiEffect::Alert(SAVE_SUCCEEDED_ALERT.into())))
            .expect("send");
        ui_tx
            .send(UiEvent::Effect(UiEffect::Alert("Error: x".into())))
            .expect("send");

        app.process_ui_events();

        assert_eq!(app.alerts.len(), 2);
        assert_eq!(app.alerts[0], SAVE_SUCCEEDED_ALERT);
        assert_eq!(app.view, AppView::Form);
    }

    #[test]
    fn loaded_config_replaces_form() {
        let (mut app, _cmd_rx, ui_tx) = test_app();
        let mut saved = NodeForm::new();
        saved.add_node_box(NodeSeed {
            node_id: Some("edge".into()),
            ..NodeSeed::default()
        });
        let payload: ConfigPayload = saved.to_payload();
        ui_tx.send(UiEvent::ConfigLoaded(payload.clone())).expect("send");

        app.process_ui_events();

        assert_eq!(app.controller.save_payload(), payload);
    }
}
