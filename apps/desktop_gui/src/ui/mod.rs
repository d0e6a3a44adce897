//! UI layer for desktop GUI: the node form, alerts and the output view.

pub mod app;

pub use app::{NodeConfigApp, StartupConfig};
