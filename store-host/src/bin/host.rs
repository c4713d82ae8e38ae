//! Headless host binary.
//!
//! Starts the components, the stdin console and signal handling.

use tracing_subscriber::EnvFilter;

use store_host_lib::app::SharedState;
use store_host_lib::{console, shutdown};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting store host (headless mode)");

    let (config, platform) = store_host_lib::init_foundation()?;
    let state = SharedState::new(config);

    store_host_lib::spawn_background_tasks(state.clone(), platform).await;

    let s = state.clone();
    tokio::spawn(async move { console::run(s).await });

    tracing::info!("Store host running. Type commands or press Ctrl+C to stop.");

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("Shutting down...");
        }
        _ = state.shutdown_token().cancelled() => {}
    }

    shutdown::graceful_shutdown(&state).await;
    Ok(())
}
