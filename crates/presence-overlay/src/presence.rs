//! Drives the overlay from app lifecycle and store status.
//!
//! Rules:
//! - app in background with the store open: show the overlay with the order count
//! - app in background with the store closed: hide it
//! - app in foreground: hide it
//! - order count changes while in background with the store open: update it

use std::sync::Arc;

use serde::Serialize;

use crate::bridge::OverlayBridge;
use crate::request::OverlayRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppLifecycle {
    Foreground,
    Background,
}

/// Business state the overlay mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceInputs {
    pub lifecycle: AppLifecycle,
    pub store_open: bool,
    pub order_count: u32,
}

impl Default for PresenceInputs {
    fn default() -> Self {
        Self {
            lifecycle: AppLifecycle::Foreground,
            store_open: false,
            order_count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayCommand {
    Show(OverlayRequest),
    Update(OverlayRequest),
    Hide,
}

/// Pure reducer from presence input changes to overlay commands.
#[derive(Debug, Clone, Default)]
pub struct PresencePolicy {
    current: PresenceInputs,
}

impl PresencePolicy {
    pub fn new(initial: PresenceInputs) -> Self {
        Self { current: initial }
    }

    pub fn inputs(&self) -> PresenceInputs {
        self.current
    }

    pub fn set_lifecycle(&mut self, lifecycle: AppLifecycle) -> Option<OverlayCommand> {
        if self.current.lifecycle == lifecycle {
            return None;
        }
        self.current.lifecycle = lifecycle;
        match lifecycle {
            AppLifecycle::Foreground => Some(OverlayCommand::Hide),
            AppLifecycle::Background => Some(self.background_command()),
        }
    }

    pub fn set_store_open(&mut self, store_open: bool) -> Option<OverlayCommand> {
        if self.current.store_open == store_open {
            return None;
        }
        self.current.store_open = store_open;
        self.in_background().then(|| self.background_command())
    }

    pub fn set_order_count(&mut self, order_count: u32) -> Option<OverlayCommand> {
        if self.current.order_count == order_count {
            return None;
        }
        self.current.order_count = order_count;
        (self.in_background() && self.current.store_open)
            .then(|| OverlayCommand::Update(self.request()))
    }

    fn in_background(&self) -> bool {
        self.current.lifecycle == AppLifecycle::Background
    }

    fn background_command(&self) -> OverlayCommand {
        if self.current.store_open {
            OverlayCommand::Show(self.request())
        } else {
            OverlayCommand::Hide
        }
    }

    fn request(&self) -> OverlayRequest {
        OverlayRequest::new(self.current.store_open, self.current.order_count)
    }
}

/// Applies [`PresencePolicy`] commands to an [`OverlayBridge`].
pub struct PresenceDriver {
    bridge: Arc<OverlayBridge>,
    policy: PresencePolicy,
}

impl PresenceDriver {
    /// Ask for overlay permission up front, then start tracking `initial`.
    pub async fn mount(bridge: Arc<OverlayBridge>, initial: PresenceInputs) -> Self {
        if !bridge.request_overlay_permission().await {
            tracing::info!("Overlay permission not granted, presence overlay stays hidden");
        }
        Self {
            bridge,
            policy: PresencePolicy::new(initial),
        }
    }

    pub fn inputs(&self) -> PresenceInputs {
        self.policy.inputs()
    }

    pub async fn lifecycle_changed(&mut self, lifecycle: AppLifecycle) {
        let command = self.policy.set_lifecycle(lifecycle);
        self.dispatch(command).await;
    }

    pub async fn store_status_changed(&mut self, store_open: bool) {
        let command = self.policy.set_store_open(store_open);
        self.dispatch(command).await;
    }

    pub async fn order_count_changed(&mut self, order_count: u32) {
        let command = self.policy.set_order_count(order_count);
        self.dispatch(command).await;
    }

    /// Owner going away: the overlay must not outlive it.
    pub async fn unmount(self) {
        self.bridge.hide_overlay().await;
        tracing::debug!("Presence driver unmounted");
    }

    async fn dispatch(&self, command: Option<OverlayCommand>) {
        let Some(command) = command else {
            return;
        };
        tracing::debug!(?command, "Presence overlay command");
        match command {
            OverlayCommand::Show(req) => {
                self.bridge
                    .show_overlay(req.is_store_open, req.order_count)
                    .await
            }
            OverlayCommand::Update(req) => {
                self.bridge
                    .update_overlay(req.is_store_open, req.order_count)
                    .await
            }
            OverlayCommand::Hide => self.bridge.hide_overlay().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::NativeOverlay;
    use crate::testing::{Call, RecordingOverlay};

    fn open_with(order_count: u32) -> PresencePolicy {
        PresencePolicy::new(PresenceInputs {
            lifecycle: AppLifecycle::Foreground,
            store_open: true,
            order_count,
        })
    }

    #[test]
    fn test_background_with_open_store_shows() {
        let mut policy = open_with(3);
        assert_eq!(
            policy.set_lifecycle(AppLifecycle::Background),
            Some(OverlayCommand::Show(OverlayRequest::new(true, 3)))
        );
        assert_eq!(policy.set_lifecycle(AppLifecycle::Background), None);
        assert_eq!(
            policy.set_lifecycle(AppLifecycle::Foreground),
            Some(OverlayCommand::Hide)
        );
    }

    #[test]
    fn test_background_with_closed_store_hides() {
        let mut policy = PresencePolicy::default();
        assert_eq!(
            policy.set_lifecycle(AppLifecycle::Background),
            Some(OverlayCommand::Hide)
        );
    }

    #[test]
    fn test_store_status_only_matters_in_background() {
        let mut policy = PresencePolicy::default();
        assert_eq!(policy.set_store_open(true), None);

        policy.set_lifecycle(AppLifecycle::Background);
        assert_eq!(policy.set_store_open(false), Some(OverlayCommand::Hide));
        assert_eq!(
            policy.set_store_open(true),
            Some(OverlayCommand::Show(OverlayRequest::new(true, 0)))
        );
    }

    #[test]
    fn test_order_count_updates_only_when_open_in_background() {
        let mut policy = open_with(0);
        assert_eq!(policy.set_order_count(1), None);

        policy.set_lifecycle(AppLifecycle::Background);
        assert_eq!(
            policy.set_order_count(2),
            Some(OverlayCommand::Update(OverlayRequest::new(true, 2)))
        );
        assert_eq!(policy.set_order_count(2), None);

        policy.set_store_open(false);
        assert_eq!(policy.set_order_count(5), None);
        assert_eq!(policy.inputs().order_count, 5);
    }

    #[tokio::test]
    async fn test_driver_follows_lifecycle() {
        let native = Arc::new(RecordingOverlay::new(false));
        let bridge = Arc::new(OverlayBridge::negotiate(Some(
            native.clone() as Arc<dyn NativeOverlay>
        )));

        let mut driver = PresenceDriver::mount(
            bridge.clone(),
            PresenceInputs {
                store_open: true,
                ..PresenceInputs::default()
            },
        )
        .await;
        assert_eq!(native.calls(), vec![Call::RequestPermission]);

        driver.lifecycle_changed(AppLifecycle::Background).await;
        driver.order_count_changed(2).await;
        driver.lifecycle_changed(AppLifecycle::Foreground).await;
        driver.order_count_changed(3).await;

        assert_eq!(
            native.calls(),
            vec![
                Call::RequestPermission,
                Call::Show(OverlayRequest::new(true, 0)),
                Call::Update(OverlayRequest::new(true, 2)),
                Call::Hide,
            ]
        );
    }

    #[tokio::test]
    async fn test_unmount_hides_overlay() {
        let native = Arc::new(RecordingOverlay::new(true));
        let bridge = Arc::new(OverlayBridge::negotiate(Some(
            native.clone() as Arc<dyn NativeOverlay>
        )));
        let mut driver = PresenceDriver::mount(bridge.clone(), PresenceInputs::default()).await;
        driver.store_status_changed(true).await;
        driver.lifecycle_changed(AppLifecycle::Background).await;
        assert!(bridge.is_overlay_showing().await);

        driver.unmount().await;
        assert!(!bridge.is_overlay_showing().await);
    }
}
