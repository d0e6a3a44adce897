//! User-facing handlers of the node form.
//!
//! Every handler reports back through a [`UiEffect`]: either an alert the
//! front end must show and acknowledge, or a navigation target. Refused edits
//! leave the form untouched.

use shared::{
    domain::{ConfigPayload, ControllerKind, NodeKey},
    error::FormError,
    protocol::{ExecuteResponse, UpdateConfigResponse},
};
use tracing::{error, info, warn};

use crate::{
    api::{ClientError, ConfigBackend},
    form::{NodeForm, NodeSeed},
};

pub const SAVE_SUCCEEDED_ALERT: &str = "Config file updated successfully!";
pub const SAVE_FAILED_ALERT: &str = "Error updating config file.";
pub const EXECUTE_FAILED_ALERT: &str = "Error executing script.";
pub const LOAD_FAILED_ALERT: &str = "Error loading config file.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Blocking message the user has to dismiss.
    Alert(String),
    /// Leave the form for the given target.
    Navigate(String),
}

impl From<FormError> for UiEffect {
    fn from(err: FormError) -> Self {
        UiEffect::Alert(err.to_string())
    }
}

pub fn save_effect(result: &Result<UpdateConfigResponse, ClientError>) -> UiEffect {
    match result {
        Ok(response) => {
            info!(message = ?response.message, "config file updated");
            UiEffect::Alert(SAVE_SUCCEEDED_ALERT.to_string())
        }
        Err(err) => {
            error!("config update failed: {err}");
            UiEffect::Alert(SAVE_FAILED_ALERT.to_string())
        }
    }
}

/// `redirect` takes precedence over `error`; empty strings count as absent and a
/// reply with neither is silent.
pub fn execute_effect(result: &Result<ExecuteResponse, ClientError>) -> Option<UiEffect> {
    match result {
        Ok(ExecuteResponse {
            redirect: Some(target),
            ..
        }) if !target.is_empty() => {
            info!(target = %target, "execution redirected");
            Some(UiEffect::Navigate(target.clone()))
        }
        Ok(ExecuteResponse {
            error: Some(message),
            ..
        }) if !message.is_empty() => Some(UiEffect::Alert(format!("Error: {message}"))),
        Ok(_) => None,
        Err(err) => {
            error!("platform execution failed: {err}");
            Some(UiEffect::Alert(EXECUTE_FAILED_ALERT.to_string()))
        }
    }
}

pub async fn submit_config<B>(backend: &B, payload: &ConfigPayload) -> UiEffect
where
    B: ConfigBackend + ?Sized,
{
    save_effect(&backend.update_config(payload).await)
}

pub async fn trigger_execution<B>(backend: &B) -> Option<UiEffect>
where
    B: ConfigBackend + ?Sized,
{
    execute_effect(&backend.execute_platform().await)
}

#[derive(Debug, Clone, Default)]
pub struct FormController {
    form: NodeForm,
}

impl FormController {
    pub fn new(form: NodeForm) -> Self {
        Self { form }
    }

    pub fn form(&self) -> &NodeForm {
        &self.form
    }

    /// Direct access for text edits and dropdown choices.
    pub fn form_mut(&mut self) -> &mut NodeForm {
        &mut self.form
    }

    pub fn add_node_box(&mut self, seed: NodeSeed) -> NodeKey {
        self.form.add_node_box(seed)
    }

    pub fn remove_node(&mut self) -> Option<UiEffect> {
        self.form.remove_last_node().err().map(UiEffect::from)
    }

    pub fn add_controller(&mut self, key: NodeKey, kind: ControllerKind) -> Option<UiEffect> {
        self.form.add_controller(key, kind).err().map(UiEffect::from)
    }

    pub fn remove_controller(&mut self, key: NodeKey, kind: ControllerKind) -> Option<UiEffect> {
        self.form.remove_controller(key, kind).err().map(UiEffect::from)
    }

    pub fn select_controller(
        &mut self,
        key: NodeKey,
        kind: ControllerKind,
        index: usize,
        value: Option<&str>,
    ) -> Option<UiEffect> {
        self.form
            .select_controller(key, kind, index, value)
            .err()
            .map(UiEffect::from)
    }

    pub fn save_payload(&self) -> ConfigPayload {
        self.form.to_payload()
    }

    pub async fn save<B>(&self, backend: &B) -> UiEffect
    where
        B: ConfigBackend + ?Sized,
    {
        submit_config(backend, &self.save_payload()).await
    }

    pub async fn execute<B>(&self, backend: &B) -> Option<UiEffect>
    where
        B: ConfigBackend + ?Sized,
    {
        trigger_execution(backend).await
    }

    /// Swaps the current form for the last saved config. The current form is
    /// kept if the backend cannot provide one.
    pub async fn load_saved<B>(&mut self, backend: &B) -> Option<UiEffect>
    where
        B: ConfigBackend + ?Sized,
    {
        match backend.get_config().await {
            Ok(payload) => {
                self.replace_with(&payload);
                None
            }
            Err(err) => {
                warn!("loading saved config failed: {err}");
                Some(UiEffect::Alert(LOAD_FAILED_ALERT.to_string()))
            }
        }
    }

    pub fn replace_with(&mut self, payload: &ConfigPayload) {
        let credentials = self.form.credentials().clone();
        self.form = NodeForm::from_payload(payload, credentials);
        info!(nodes = self.form.len(), "form rebuilt from saved config");
    }
}
