//! Background relays from component outputs to the UI event bus.

use connectivity_monitor::{AlertView, AnimationCue};
use notify_permission::PermissionOrchestrator;
use presence_overlay::OverlayEvent;
use tokio::sync::{broadcast, watch};

use crate::app::SharedState;
use crate::events::{self, PermissionPayload};

/// Publish every connectivity alert view change.
pub async fn connectivity_alert_relay(state: SharedState, mut views: watch::Receiver<AlertView>) {
    let shutdown_token = state.shutdown_token().clone();
    loop {
        let changed = tokio::select! {
            _ = shutdown_token.cancelled() => break,
            changed = views.changed() => changed,
        };
        if changed.is_err() {
            break;
        }
        let view = *views.borrow_and_update();
        tracing::debug!(?view, "Connectivity alert changed");
        events::publish(state.bus_sender(), events::CONNECTIVITY_ALERT, view);
    }
    tracing::info!("Connectivity alert relay stopped");
}

/// Publish banner animation cues.
pub async fn connectivity_animation_relay(
    state: SharedState,
    mut cues: broadcast::Receiver<AnimationCue>,
) {
    let shutdown_token = state.shutdown_token().clone();
    loop {
        let cue = tokio::select! {
            _ = shutdown_token.cancelled() => break,
            cue = cues.recv() => cue,
        };
        match cue {
            Ok(cue) => events::publish(state.bus_sender(), events::CONNECTIVITY_ANIMATION, cue),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!("Connectivity animation relay lagged by {n} cues");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    tracing::info!("Connectivity animation relay stopped");
}

/// Forward overlay taps to the UI.
pub async fn overlay_click_relay(state: SharedState) {
    let shutdown_token = state.shutdown_token().clone();
    let mut clicks = state.overlay().subscribe();
    loop {
        let event = tokio::select! {
            _ = shutdown_token.cancelled() => break,
            event = clicks.recv() => event,
        };
        match event {
            Ok(OverlayEvent::Clicked) => {
                tracing::info!("Floating overlay clicked");
                events::publish(state.bus_sender(), events::OVERLAY_CLICKED, ());
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!("Overlay click relay lagged by {n} events");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    tracing::info!("Overlay click relay stopped");
}

/// Run the notification permission flow once and publish the outcome.
pub async fn notification_permission_check(state: SharedState, orchestrator: PermissionOrchestrator) {
    let decision = orchestrator.ensure_notification_permission().await;
    events::publish(
        state.bus_sender(),
        events::NOTIFICATION_PERMISSION,
        PermissionPayload {
            decision,
            platform: orchestrator.platform().family(),
        },
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use connectivity_monitor::{AlertVariant, ConnectivityState};
    use notify_permission::NotificationPlatform;
    use serde_json::Value;

    use super::*;
    use crate::config::AppConfig;
    use crate::platform::BusPrompter;

    async fn next_message(rx: &mut broadcast::Receiver<String>) -> Value {
        let msg = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        serde_json::from_str(&msg).unwrap()
    }

    #[tokio::test]
    async fn test_alert_relay_publishes_views_until_shutdown() {
        let state = SharedState::new(AppConfig::default());
        let mut rx = state.subscribe_bus();
        let (tx, views) = watch::channel(AlertView::default());
        let relay = tokio::spawn(connectivity_alert_relay(state.clone(), views));

        tx.send(AlertView {
            state: ConnectivityState::Disconnected,
            visible: true,
            variant: Some(AlertVariant::NoConnection),
        })
        .unwrap();
        let msg = next_message(&mut rx).await;
        assert_eq!(msg["type"], events::CONNECTIVITY_ALERT);
        assert_eq!(msg["data"]["state"], "disconnected");
        assert_eq!(msg["data"]["variant"], "no_connection");

        state.shutdown_token().cancel();
        relay.await.unwrap();
    }

    #[tokio::test]
    async fn test_permission_outcome_is_published() {
        let state = SharedState::new(AppConfig::default());
        let mut rx = state.subscribe_bus();
        let orchestrator = PermissionOrchestrator::new(
            NotificationPlatform::Unrestricted,
            Arc::new(BusPrompter::new(state.bus_sender().clone())),
        );

        notification_permission_check(state.clone(), orchestrator).await;
        let msg = next_message(&mut rx).await;
        assert_eq!(msg["type"], events::NOTIFICATION_PERMISSION);
        assert_eq!(msg["data"]["decision"], "not_applicable");
        assert_eq!(msg["data"]["platform"], "unrestricted");
    }
}
