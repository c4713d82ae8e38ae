//! Platform connectivity source contract.

use futures::future::BoxFuture;
use tokio::sync::mpsc;

use crate::Result;
use crate::reachability::RawConnectivity;

type UnsubscribeHook = Box<dyn FnOnce() + Send>;

/// Platform signal source: one-shot snapshot plus a push subscription.
pub trait ConnectivitySource: Send + Sync + 'static {
    /// Fetch the current connectivity snapshot.
    fn fetch(&self) -> BoxFuture<'_, Result<RawConnectivity>>;

    /// Subscribe to connectivity changes, in platform emission order.
    fn subscribe(&self) -> Result<Subscription>;
}

/// A live connectivity subscription.
///
/// The unsubscribe hook runs exactly once, on [`Subscription::unsubscribe`]
/// or when the subscription is dropped.
pub struct Subscription {
    events: mpsc::Receiver<RawConnectivity>,
    unsubscribe: Option<UnsubscribeHook>,
}

impl Subscription {
    pub fn new(
        events: mpsc::Receiver<RawConnectivity>,
        unsubscribe: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            events,
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Subscription whose source needs no teardown beyond closing the channel.
    pub fn detached(events: mpsc::Receiver<RawConnectivity>) -> Self {
        Self {
            events,
            unsubscribe: None,
        }
    }

    /// Next event, or `None` once the source closed the stream.
    pub async fn recv(&mut self) -> Option<RawConnectivity> {
        self.events.recv().await
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.events.close();
        if let Some(hook) = self.unsubscribe.take() {
            hook();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("has_unsubscribe_hook", &self.unsubscribe.is_some())
            .finish()
    }
}
