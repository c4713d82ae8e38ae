//! Floating overlay rendered by UI clients on the event bus.

use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::BoxFuture;
use presence_overlay::request::ATTENTION_PULSES;
use presence_overlay::{NativeOverlay, OverlayEvent, OverlayRequest};
use tokio::sync::broadcast;

use crate::events::{self, OverlayPayload};

const CLICK_CAPACITY: usize = 16;

impl From<OverlayRequest> for OverlayPayload {
    fn from(request: OverlayRequest) -> Self {
        let highlight = request.needs_attention();
        Self {
            status: request.status_label(),
            is_store_open: request.is_store_open,
            order_count: request.order_count,
            orders_label: request.order_label(),
            highlight,
            pulses: if highlight { ATTENTION_PULSES } else { 0 },
        }
    }
}

/// [`NativeOverlay`] that publishes show/update/hide as bus events.
///
/// Draw-over permission is fixed by configuration; requesting it does not
/// change the answer.
pub struct EventBusOverlay {
    bus: broadcast::Sender<String>,
    permission_granted: bool,
    showing: AtomicBool,
    clicks: broadcast::Sender<OverlayEvent>,
}

impl EventBusOverlay {
    pub fn new(bus: broadcast::Sender<String>, permission_granted: bool) -> Self {
        let (clicks, _) = broadcast::channel(CLICK_CAPACITY);
        Self {
            bus,
            permission_granted,
            showing: AtomicBool::new(false),
            clicks,
        }
    }

    /// Report a tap on the overlay.
    pub fn click(&self) {
        if !self.showing.load(Ordering::SeqCst) {
            tracing::debug!("Overlay click ignored, overlay hidden");
            return;
        }
        let _ = self.clicks.send(OverlayEvent::Clicked);
    }
}

impl NativeOverlay for EventBusOverlay {
    fn show(&self, request: OverlayRequest) -> BoxFuture<'_, presence_overlay::Result<()>> {
        Box::pin(async move {
            events::publish(&self.bus, events::OVERLAY_SHOW, OverlayPayload::from(request));
            self.showing.store(true, Ordering::SeqCst);
            Ok(())
        })
    }

    fn update(&self, request: OverlayRequest) -> BoxFuture<'_, presence_overlay::Result<()>> {
        Box::pin(async move {
            events::publish(&self.bus, events::OVERLAY_UPDATE, OverlayPayload::from(request));
            Ok(())
        })
    }

    fn hide(&self) -> BoxFuture<'_, presence_overlay::Result<()>> {
        Box::pin(async move {
            events::publish(&self.bus, events::OVERLAY_HIDE, ());
            self.showing.store(false, Ordering::SeqCst);
            Ok(())
        })
    }

    fn request_permission(&self) -> BoxFuture<'_, presence_overlay::Result<bool>> {
        Box::pin(async move { Ok(self.permission_granted) })
    }

    fn check_permission(&self) -> BoxFuture<'_, presence_overlay::Result<bool>> {
        Box::pin(async move { Ok(self.permission_granted) })
    }

    fn is_showing(&self) -> BoxFuture<'_, presence_overlay::Result<bool>> {
        Box::pin(async move { Ok(self.showing.load(Ordering::SeqCst)) })
    }

    fn subscribe_events(&self) -> broadcast::Receiver<OverlayEvent> {
        self.clicks.subscribe()
    }
}
