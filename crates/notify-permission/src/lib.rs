//! One-shot notification permission flow.
//!
//! Branches per platform family: a single unified authorization call, a
//! version-gated runtime permission, or no explicit grant at all. The outcome
//! is computed once per orchestrator and never persisted.

pub mod orchestrator;
pub mod platform;
pub mod prompt;

// Re-exports for convenience
pub use orchestrator::{PermissionDecision, PermissionOrchestrator};
pub use platform::{
    AuthorizationStatus, EXPLICIT_GRANT_MIN_API_LEVEL, NotificationPlatform, POST_NOTIFICATIONS,
    RuntimePermissionResult, RuntimePermissions, UnifiedAuthorization,
};
pub use prompt::{ExplanatoryPrompt, PermissionRationale, Prompter};

/// Errors reported by platform permission APIs.
#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
    #[error("Authorization request failed: {0}")]
    Authorization(String),

    #[error("Runtime permission request failed: {0}")]
    Request(String),
}

/// Result type alias for permission operations.
pub type Result<T> = std::result::Result<T, PermissionError>;
