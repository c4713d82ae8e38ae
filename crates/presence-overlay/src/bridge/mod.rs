//! Capability-negotiated overlay bridge.
//!
//! The backend is chosen once in [`OverlayBridge::negotiate`]. Calls are
//! serialized through one async mutex so they reach the native side in caller
//! order; the overlay is a single process-wide resource and the last call wins.
//! Native failures are logged and absorbed here, never returned to callers.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, broadcast};

use crate::OverlayError;
use crate::native::{NativeOverlay, NoopOverlay, OverlayEvent};
use crate::request::OverlayRequest;


/// Whether overlay requests can reach the native layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayCapability {
    /// No native overlay on this platform/build.
    Unsupported,
    PermissionNotGranted,
    Ready,
}

impl OverlayCapability {
    fn from_grant(granted: bool) -> Self {
        if granted {
            Self::Ready
        } else {
            Self::PermissionNotGranted
        }
    }
}

/// What this bridge believes is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Screen {
    /// Nothing observed yet, or a native call failed midway. An overlay left
    /// by an earlier process may still be up.
    #[default]
    Unknown,
    Hidden,
    Showing(OverlayRequest),
}

#[derive(Debug, Default)]
struct BridgeState {
    /// Resolved lazily; fixed to `Unsupported` when negotiation found no backend.
    capability: Option<OverlayCapability>,
    screen: Screen,
}

impl BridgeState {
    fn record_failure(&mut self, error: &OverlayError) {
        self.screen = Screen::Unknown;
        if matches!(error, OverlayError::PermissionDenied) {
            self.capability = Some(OverlayCapability::PermissionNotGranted);
        }
    }
}

/// Typed front for the floating overlay.
pub struct OverlayBridge {
    native: Arc<dyn NativeOverlay>,
    state: Mutex<BridgeState>,
}

impl OverlayBridge {
    /// Select the backend once: the native overlay if present, otherwise the no-op fallback.
    pub fn negotiate(native: Option<Arc<dyn NativeOverlay>>) -> Self {
        match native {
            Some(native) => {
                tracing::info!("Floating overlay capability detected");
                Self {
                    native,
                    state: Mutex::new(BridgeState::default()),
                }
            }
            None => {
                tracing::info!("Floating overlay not available on this platform, using no-op bridge");
                Self::unsupported()
            }
        }
    }

    pub fn unsupported() -> Self {
        Self {
            native: Arc::new(NoopOverlay::new()),
            state: Mutex::new(BridgeState {
                capability: Some(OverlayCapability::Unsupported),
                screen: Screen::Hidden,
            }),
        }
    }

    /// Current capability, resolving it on first use.
    pub async fn capability(&self) -> OverlayCapability {
        let mut state = self.state.lock().await;
        self.resolve_capability(&mut state).await
    }

    /// Make the overlay visible with the given content.
    pub async fn show_overlay(&self, is_store_open: bool, order_count: u32) {
        let request = OverlayRequest::new(is_store_open, order_count);
        let mut state = self.state.lock().await;

        let capability = self.resolve_capability(&mut state).await;
        if capability != OverlayCapability::Ready {
            tracing::warn!(?capability, "Cannot show floating overlay");
            return;
        }
        if state.screen == Screen::Showing(request) {
            tracing::debug!("Floating overlay already showing identical content");
            return;
        }

        match self.native.show(request).await {
            Ok(()) => {
                tracing::debug!(
                    status = request.status_label(),
                    orders = request.order_count,
                    "Floating overlay shown"
                );
                state.screen = Screen::Showing(request);
            }
            Err(e) => {
                tracing::error!("Failed to show floating overlay: {e}");
                state.record_failure(&e);
            }
        }
    }

    /// Change the displayed content without a visibility transition.
    ///
    /// While hidden this has no visible effect.
    pub async fn update_overlay(&self, is_store_open: bool, order_count: u32) {
        let request = OverlayRequest::new(is_store_open, order_count);
        let mut state = self.state.lock().await;

        let capability = self.resolve_capability(&mut state).await;
        if capability != OverlayCapability::Ready {
            tracing::warn!(?capability, "Cannot update floating overlay");
            return;
        }
        match state.screen {
            Screen::Unknown | Screen::Hidden => {
                tracing::debug!("Floating overlay not shown, update has no visible effect");
                return;
            }
            Screen::Showing(current) if current == request => return,
            Screen::Showing(_) => {}
        }

        match self.native.update(request).await {
            Ok(()) => {
                tracing::debug!(orders = request.order_count, "Floating overlay updated");
                state.screen = Screen::Showing(request);
            }
            Err(e) => {
                tracing::error!("Failed to update floating overlay: {e}");
                state.record_failure(&e);
            }
        }
    }

    pub async fn hide_overlay(&self) {
        let mut state = self.state.lock().await;
        if state.capability == Some(OverlayCapability::Unsupported) {
            tracing::warn!("Floating overlay is not available, hide ignored");
            return;
        }
        if state.screen == Screen::Hidden {
            return;
        }

        // Unknown still reaches native: an earlier process may have left it up.
        match self.native.hide().await {
            Ok(()) => {
                state.screen = Screen::Hidden;
                tracing::debug!("Floating overlay hidden");
            }
            Err(e) => {
                tracing::error!("Failed to hide floating overlay: {e}");
                state.record_failure(&e);
            }
        }
    }

    /// Trigger the OS consent flow and return the resulting grant.
    pub async fn request_overlay_permission(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.capability == Some(OverlayCapability::Unsupported) {
            tracing::warn!("Floating overlay is not available, permission request ignored");
            return false;
        }

        let granted = match self.native.request_permission().await {
            Ok(granted) => granted,
            Err(e) => {
                tracing::error!("Failed to request overlay permission: {e}");
                false
            }
        };
        state.capability = Some(OverlayCapability::from_grant(granted));
        if !granted {
            tracing::warn!("Overlay permission not granted");
        }
        granted
    }

    /// Re-validate the permission with the platform.
    pub async fn check_overlay_permission(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.capability == Some(OverlayCapability::Unsupported) {
            return false;
        }
        let granted = self.query_permission().await;
        state.capability = Some(OverlayCapability::from_grant(granted));
        granted
    }

    /// Ask the native side, and resync the local view with its answer.
    pub async fn is_overlay_showing(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.capability == Some(OverlayCapability::Unsupported) {
            return false;
        }
        match self.native.is_showing().await {
            Ok(false) => {
                if state.screen != Screen::Hidden {
                    tracing::debug!("Floating overlay gone outside the bridge");
                }
                state.screen = Screen::Hidden;
                false
            }
            Ok(true) => {
                // Visible, but with content we did not put there.
                if !matches!(state.screen, Screen::Showing(_)) {
                    state.screen = Screen::Unknown;
                }
                true
            }
            Err(e) => {
                tracing::error!("Failed to query floating overlay visibility: {e}");
                state.screen = Screen::Unknown;
                false
            }
        }
    }

    /// Overlay events (`OVERLAY_CLICKED`). Never fires when unsupported.
    pub fn subscribe(&self) -> broadcast::Receiver<OverlayEvent> {
        self.native.subscribe_events()
    }

    async fn resolve_capability(&self, state: &mut BridgeState) -> OverlayCapability {
        if let Some(capability) = state.capability {
            return capability;
        }
        let capability = OverlayCapability::from_grant(self.query_permission().await);
        tracing::debug!(?capability, "Floating overlay capability resolved");
        state.capability = Some(capability);
        capability
    }

    async fn query_permission(&self) -> bool {
        match self.native.check_permission().await {
            Ok(granted) => granted,
            Err(e) => {
                tracing::error!("Failed to check overlay permission: {e}");
                false
            }
        }
    }
}
