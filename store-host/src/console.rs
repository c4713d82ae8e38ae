//! Line-oriented operator console on stdin.
//!
//! Drives business state (store status, order count, app lifecycle) and
//! user gestures that a real UI would produce.

use std::io::BufRead;

use presence_overlay::AppLifecycle;
use tokio::sync::mpsc;

use crate::app::SharedState;
use crate::events::{self, PresencePayload};

const LINE_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    StoreOpen(bool),
    Orders(u32),
    Lifecycle(AppLifecycle),
    /// Close the connectivity banner.
    Dismiss,
    /// Tap the floating overlay.
    Click,
    Status,
    Quit,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            return Err("empty command".into());
        };
        let command = match cmd.to_ascii_lowercase().as_str() {
            "open" => Self::StoreOpen(true),
            "close" => Self::StoreOpen(false),
            "orders" => {
                let n = parts.next().ok_or("usage: orders <count>")?;
                Self::Orders(n.parse().map_err(|_| format!("invalid order count: {n}"))?)
            }
            "background" | "bg" => Self::Lifecycle(AppLifecycle::Background),
            "foreground" | "fg" => Self::Lifecycle(AppLifecycle::Foreground),
            "dismiss" => Self::Dismiss,
            "click" => Self::Click,
            "status" => Self::Status,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command: {other}")),
        };
        if parts.next().is_some() {
            return Err(format!("unexpected arguments for {cmd}"));
        }
        Ok(command)
    }
}

/// Read commands from stdin until EOF or shutdown.
///
/// Stdin is read on a dedicated thread so a pending read never holds up
/// runtime shutdown.
pub async fn run(state: SharedState) {
    let (tx, rx) = mpsc::channel(LINE_CAPACITY);
    let spawned = std::thread::Builder::new()
        .name("console-stdin".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Console read failed: {e}");
                        break;
                    }
                }
            }
        });
    if let Err(e) = spawned {
        tracing::error!("Failed to start console reader: {e}");
        return;
    }
    run_lines(state, rx).await;
}

/// Execute command lines until the sender closes or shutdown.
pub async fn run_lines(state: SharedState, mut lines: mpsc::Receiver<String>) {
    let shutdown_token = state.shutdown_token().clone();
    loop {
        let line = tokio::select! {
            biased;
            _ = shutdown_token.cancelled() => break,
            line = lines.recv() => line,
        };
        let Some(line) = line else {
            tracing::debug!("Console input closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match ConsoleCommand::parse(&line) {
            Ok(command) => execute(&state, command).await,
            Err(e) => tracing::warn!("{e}"),
        }
    }
}

pub async fn execute(state: &SharedState, command: ConsoleCommand) {
    tracing::debug!(?command, "Console command");
    match command {
        ConsoleCommand::StoreOpen(_) | ConsoleCommand::Orders(_) | ConsoleCommand::Lifecycle(_) => {
            let mut presence = state.presence().lock().await;
            let Some(driver) = presence.as_mut() else {
                tracing::warn!("Presence driver not mounted");
                return;
            };
            match command {
                ConsoleCommand::StoreOpen(open) => driver.store_status_changed(open).await,
                ConsoleCommand::Orders(n) => driver.order_count_changed(n).await,
                ConsoleCommand::Lifecycle(lifecycle) => driver.lifecycle_changed(lifecycle).await,
                _ => {}
            }
            let inputs = driver.inputs();
            events::publish(
                state.bus_sender(),
                events::PRESENCE_CHANGED,
                PresencePayload {
                    lifecycle: inputs.lifecycle,
                    store_open: inputs.store_open,
                    order_count: inputs.order_count,
                },
            );
        }
        ConsoleCommand::Dismiss => match state.monitor().lock().await.as_ref() {
            Some(monitor) => monitor.dismiss(),
            None => tracing::warn!("Connectivity monitor not running"),
        },
        ConsoleCommand::Click => match state.overlay_backend() {
            Some(backend) => backend.click(),
            None => tracing::warn!("Floating overlay is not available"),
        },
        ConsoleCommand::Status => {
            let view = state.monitor().lock().await.as_ref().map(|m| m.view());
            let presence = state.presence().lock().await.as_ref().map(|d| d.inputs());
            let capability = state.overlay().capability().await;
            let showing = state.overlay().is_overlay_showing().await;
            tracing::info!(?view, ?presence, ?capability, showing, "Status");
        }
        ConsoleCommand::Quit => {
            tracing::info!("Quit requested from console");
            state.shutdown_token().cancel();
        }
    }
}
