//! Client side of the node configuration form: the form state, its HTML
//! render, the backend client and the handlers tying them together.

pub mod api;
pub mod controller;
pub mod form;
pub mod render;
pub mod settings;

pub use api::{ClientError, ConfigBackend, ConfigClient};
pub use controller::{
    execute_effect, save_effect, submit_config, trigger_execution, FormController, UiEffect,
};
pub use form::{ControllerSlot, NodeBox, NodeCredentials, NodeForm, NodeSeed};
pub use render::render_form_html;
pub use settings::{load_settings, ClientSettings};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
