//! UI/backend events and error modeling for desktop GUI controller.

use client_core::UiEffect;
use shared::domain::ConfigPayload;

pub enum UiEvent {
    Info(String),
    Effect(UiEffect),
    ConfigLoaded(ConfigPayload),
    OutputLoaded { target: String, text: String },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Backend,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Output,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("failed to connect")
            || message_lower.contains("connection")
            || message_lower.contains("timed out")
            || message_lower.contains("dns")
            || message_lower.contains("request to")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("invalid")
            || message_lower.contains("unreadable")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains(" returned ") {
            UiErrorCategory::Backend
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Short line for the status bar.
    pub fn summary(&self) -> String {
        let what = match self.context {
            UiErrorContext::BackendStartup => "Backend startup",
            UiErrorContext::Output => "Loading output",
        };
        let why = match self.category {
            UiErrorCategory::Transport => "server unreachable",
            UiErrorCategory::Backend => "server reported an error",
            UiErrorCategory::Validation => "invalid data",
            UiErrorCategory::Unknown => "unexpected error",
        };
        format!("{what} failed ({why}): {}", self.message)
    }
}
