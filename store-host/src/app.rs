use std::sync::Arc;

use connectivity_monitor::ConnectivityMonitor;
use presence_overlay::{NativeOverlay, OverlayBridge, PresenceDriver};
use tokio::sync::{Mutex, broadcast};
use tokio_util::sync::CancellationToken;

use crate::config::{AppConfig, OverlayBackend};
use crate::platform::EventBusOverlay;

/// Application shared state handed to every task.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Broadcast channel for UI event messages
    bus_tx: broadcast::Sender<String>,
    config: AppConfig,
    shutdown_token: CancellationToken,
    overlay: Arc<OverlayBridge>,
    /// Present when the overlay is rendered on the bus; used to relay taps.
    overlay_backend: Option<Arc<EventBusOverlay>>,
    monitor: Mutex<Option<ConnectivityMonitor>>,
    presence: Mutex<Option<PresenceDriver>>,
}

impl SharedState {
    pub fn new(config: AppConfig) -> Self {
        let (bus_tx, _) = broadcast::channel(config.event_bus_capacity);

        let overlay_backend = match config.overlay_backend {
            OverlayBackend::Events => Some(Arc::new(EventBusOverlay::new(
                bus_tx.clone(),
                config.overlay_permission_granted,
            ))),
            OverlayBackend::None => None,
        };
        let native = overlay_backend
            .clone()
            .map(|backend| backend as Arc<dyn NativeOverlay>);
        let overlay = Arc::new(OverlayBridge::negotiate(native));

        Self {
            inner: Arc::new(SharedStateInner {
                bus_tx,
                config,
                shutdown_token: CancellationToken::new(),
                overlay,
                overlay_backend,
                monitor: Mutex::new(None),
                presence: Mutex::new(None),
            }),
        }
    }

    pub fn bus_sender(&self) -> &broadcast::Sender<String> {
        &self.inner.bus_tx
    }

    pub fn subscribe_bus(&self) -> broadcast::Receiver<String> {
        self.inner.bus_tx.subscribe()
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }

    pub fn overlay(&self) -> &Arc<OverlayBridge> {
        &self.inner.overlay
    }

    pub fn overlay_backend(&self) -> Option<&Arc<EventBusOverlay>> {
        self.inner.overlay_backend.as_ref()
    }

    pub fn monitor(&self) -> &Mutex<Option<ConnectivityMonitor>> {
        &self.inner.monitor
    }

    pub fn presence(&self) -> &Mutex<Option<PresenceDriver>> {
        &self.inner.presence
    }
}
