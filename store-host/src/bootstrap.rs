use std::sync::Arc;

use connectivity_monitor::ConnectivityMonitor;
use notify_permission::{NotificationPlatform, PermissionOrchestrator};
use presence_overlay::{PresenceDriver, PresenceInputs};

use crate::app::SharedState;
use crate::background;
use crate::config::AppConfig;
use crate::platform::{BusPrompter, ProbeConnectivitySource};

/// Foundation init (fatal on error).
pub fn init_foundation() -> Result<(AppConfig, NotificationPlatform), anyhow::Error> {
    load_dotenv();

    let config = AppConfig::load();
    let overridden = AppConfig::overridden_keys(|key| std::env::var(key).ok());
    if !overridden.is_empty() {
        tracing::info!("Settings overridden from environment: {overridden:?}");
    }

    let platform = notification_platform(&config.notification_platform)?;

    tracing::info!(
        probe = %config.probe_addr,
        overlay = ?config.overlay_backend,
        notifications = platform.family(),
        "Settings loaded"
    );
    Ok((config, platform))
}

/// Map the configured notification model onto a permission platform.
pub fn notification_platform(name: &str) -> Result<NotificationPlatform, anyhow::Error> {
    match name {
        "unrestricted" => Ok(NotificationPlatform::Unrestricted),
        other => anyhow::bail!("unsupported notification platform: {other}"),
    }
}

/// Start every component and its relay (non-fatal).
pub async fn spawn_background_tasks(state: SharedState, platform: NotificationPlatform) {
    // Connectivity monitor
    let source = ProbeConnectivitySource::from_config(state.config(), state.shutdown_token().clone());
    let monitor =
        ConnectivityMonitor::start_with_policy(Arc::new(source), state.config().reachability_policy);

    let s = state.clone();
    let views = monitor.subscribe();
    tokio::spawn(async move { background::connectivity_alert_relay(s, views).await });

    let s = state.clone();
    let cues = monitor.animations();
    tokio::spawn(async move { background::connectivity_animation_relay(s, cues).await });

    *state.monitor().lock().await = Some(monitor);

    // Notification permission, once per process
    let orchestrator = PermissionOrchestrator::new(
        platform,
        Arc::new(BusPrompter::new(state.bus_sender().clone())),
    );
    let s = state.clone();
    tokio::spawn(async move { background::notification_permission_check(s, orchestrator).await });

    // Floating overlay
    let s = state.clone();
    tokio::spawn(async move { background::overlay_click_relay(s).await });

    let driver = PresenceDriver::mount(state.overlay().clone(), PresenceInputs::default()).await;
    *state.presence().lock().await = Some(driver);

    tracing::info!("Background tasks started");
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_platform_mapping() {
        assert!(matches!(
            notification_platform("unrestricted"),
            Ok(NotificationPlatform::Unrestricted)
        ));
        assert!(notification_platform("ios").is_err());
    }
}
