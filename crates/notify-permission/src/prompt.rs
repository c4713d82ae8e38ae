//! User-facing texts for the permission flow.

use serde::Serialize;

/// Rationale shown by the OS alongside the runtime permission request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRationale {
    pub title: &'static str,
    pub message: &'static str,
    pub button_neutral: &'static str,
    pub button_negative: &'static str,
    pub button_positive: &'static str,
}

impl PermissionRationale {
    pub const ORDER_NOTIFICATIONS: Self = Self {
        title: "Notification Permission",
        message: "We need permission to send you order notifications",
        button_neutral: "Ask Me Later",
        button_negative: "Cancel",
        button_positive: "OK",
    };
}

/// Informational prompt shown once when notifications end up disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplanatoryPrompt {
    pub title: &'static str,
    pub message: &'static str,
    pub button: &'static str,
}

impl ExplanatoryPrompt {
    pub const ENABLE_NOTIFICATIONS: Self = Self {
        title: "Enable Notifications",
        message: "Please enable notifications in your device settings to receive order updates.",
        button: "OK",
    };
}

/// Surfaces an explanatory prompt to the user. Must not block.
pub trait Prompter: Send + Sync {
    fn show(&self, prompt: &ExplanatoryPrompt);
}
