//! Floating store-presence overlay bridge.
//!
//! Wraps an optional native overlay (a window drawn over other apps that
//! mirrors store open/closed state and the active order count) behind a
//! capability-negotiated bridge. When the native side is absent every call
//! resolves to a safe default instead of failing.

pub mod bridge;
pub mod native;
pub mod presence;
pub mod request;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use bridge::{OverlayBridge, OverlayCapability};
pub use native::{NativeOverlay, NoopOverlay, OVERLAY_CLICKED, OverlayEvent};
pub use presence::{AppLifecycle, OverlayCommand, PresenceDriver, PresenceInputs, PresencePolicy};
pub use request::OverlayRequest;

/// Errors reported by a native overlay implementation.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("Overlay permission not granted")]
    PermissionDenied,

    #[error("Overlay service error: {0}")]
    Service(String),

    #[error("Overlay permission request failed: {0}")]
    PermissionRequest(String),
}

/// Result type alias for overlay operations.
pub type Result<T> = std::result::Result<T, OverlayError>;
