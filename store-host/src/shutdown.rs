use std::time::Duration;

use tokio::time::sleep;

use crate::app::SharedState;

pub async fn graceful_shutdown(state: &SharedState) {
    tracing::info!("Shutdown sequence started");

    if let Some(monitor) = state.monitor().lock().await.take() {
        monitor.teardown().await;
        tracing::info!("Shutdown: connectivity monitor stopped");
    }

    if let Some(driver) = state.presence().lock().await.take() {
        driver.unmount().await;
        tracing::info!("Shutdown: floating overlay hidden");
    }

    state.shutdown_token().cancel();
    tracing::info!("Shutdown: background loops cancelled");

    sleep(Duration::from_millis(200)).await;
    tracing::info!("Shutdown sequence completed");
}

#[cfg(test)]
mod tests {
    use presence_overlay::{AppLifecycle, PresenceDriver, PresenceInputs};

    use super::*;
    use crate::config::AppConfig;

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_hides_overlay_and_cancels() {
        let state = SharedState::new(AppConfig::default());
        let mut driver = PresenceDriver::mount(state.overlay().clone(), PresenceInputs::default()).await;
        driver.store_status_changed(true).await;
        driver.lifecycle_changed(AppLifecycle::Background).await;
        assert!(state.overlay().is_overlay_showing().await);
        *state.presence().lock().await = Some(driver);

        graceful_shutdown(&state).await;

        assert!(!state.overlay().is_overlay_showing().await);
        assert!(state.shutdown_token().is_cancelled());
        assert!(state.presence().lock().await.is_none());
        assert!(state.monitor().lock().await.is_none());
    }
}
