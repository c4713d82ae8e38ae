//! Native overlay contract and the no-op fallback.

use futures::future::BoxFuture;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::Result;
use crate::request::OverlayRequest;

/// Event name emitted when the user taps the overlay.
pub const OVERLAY_CLICKED: &str = "OVERLAY_CLICKED";

const EVENT_CAPACITY: usize = 16;

/// Events relayed from the native overlay. The bridge does not interpret them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverlayEvent {
    Clicked,
}

impl OverlayEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Clicked => OVERLAY_CLICKED,
        }
    }
}

/// Platform-side overlay capability.
///
/// `show`/`update`/`hide` are fire-and-forget from the caller's point of view;
/// the query methods return the native answer.
pub trait NativeOverlay: Send + Sync {
    fn show(&self, request: OverlayRequest) -> BoxFuture<'_, Result<()>>;

    fn update(&self, request: OverlayRequest) -> BoxFuture<'_, Result<()>>;

    fn hide(&self) -> BoxFuture<'_, Result<()>>;

    /// Start the OS consent flow for drawing over other apps.
    fn request_permission(&self) -> BoxFuture<'_, Result<bool>>;

    fn check_permission(&self) -> BoxFuture<'_, Result<bool>>;

    fn is_showing(&self) -> BoxFuture<'_, Result<bool>>;

    fn subscribe_events(&self) -> broadcast::Receiver<OverlayEvent>;
}

/// Fallback used when the platform or build has no overlay.
///
/// Every operation resolves to `false`/`()` and the event stream never fires.
#[derive(Debug)]
pub struct NoopOverlay {
    // Held so subscribers wait forever instead of seeing a closed channel.
    events: broadcast::Sender<OverlayEvent>,
}

impl NoopOverlay {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { events }
    }
}

impl Default for NoopOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeOverlay for NoopOverlay {
    fn show(&self, _request: OverlayRequest) -> BoxFuture<'_, Result<()>> {
        Box::pin(async { Ok(()) })
    }

    fn update(&self, _request: OverlayRequest) -> BoxFuture<'_, Result<()>> {
        Box::pin(async { Ok(()) })
    }

    fn hide(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async { Ok(()) })
    }

    fn request_permission(&self) -> BoxFuture<'_, Result<bool>> {
        Box::pin(async { Ok(false) })
    }

    fn check_permission(&self) -> BoxFuture<'_, Result<bool>> {
        Box::pin(async { Ok(false) })
    }

    fn is_showing(&self) -> BoxFuture<'_, Result<bool>> {
        Box::pin(async { Ok(false) })
    }

    fn subscribe_events(&self) -> broadcast::Receiver<OverlayEvent> {
        self.events.subscribe()
    }
}
