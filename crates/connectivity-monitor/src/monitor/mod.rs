//! Runtime driver for [`AlertMachine`].
//!
//! A single task owns the machine, the platform subscription and the dwell
//! timer. Cancelling the task releases all three together, so nothing can
//! mutate state after teardown.

use std::future::pending;
use std::pin::Pin;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Sleep, sleep};
use tokio_util::sync::CancellationToken;

use crate::machine::{AlertMachine, AlertView, AnimationCue, Effect, Input, RESTORED_DWELL};
use crate::reachability::{DEFAULT_REACHABILITY_POLICY, RawConnectivity, ReachabilityPolicy};
use crate::source::{ConnectivitySource, Subscription};


const ANIMATION_CAPACITY: usize = 32;

enum Command {
    Dismiss,
}

/// Handle to a running connectivity monitor.
///
/// Dropping the handle tears the monitor down; [`ConnectivityMonitor::teardown`]
/// additionally waits until the task has released its listener and timer.
pub struct ConnectivityMonitor {
    view_rx: watch::Receiver<AlertView>,
    animation_tx: broadcast::Sender<AnimationCue>,
    command_tx: mpsc::UnboundedSender<Command>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ConnectivityMonitor {
    /// Start monitoring with the default reachability policy.
    pub fn start(source: Arc<dyn ConnectivitySource>) -> Self {
        Self::start_with_policy(source, DEFAULT_REACHABILITY_POLICY)
    }

    pub fn start_with_policy(source: Arc<dyn ConnectivitySource>, policy: ReachabilityPolicy) -> Self {
        let (view_tx, view_rx) = watch::channel(AlertView::default());
        let (animation_tx, _) = broadcast::channel(ANIMATION_CAPACITY);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let worker = Worker {
            policy,
            machine: AlertMachine::new(),
            dwell: None,
            view_tx,
            animation_tx: animation_tx.clone(),
        };
        let task = tokio::spawn(worker.run(source, command_rx, cancel.clone()));
        tracing::info!(?policy, "Connectivity monitor started");

        Self {
            view_rx,
            animation_tx,
            command_tx,
            cancel,
            task: Some(task),
        }
    }

    /// Current view.
    pub fn view(&self) -> AlertView {
        *self.view_rx.borrow()
    }

    /// Observe view changes.
    pub fn subscribe(&self) -> watch::Receiver<AlertView> {
        self.view_rx.clone()
    }

    /// Observe slide-in / slide-out cues.
    pub fn animations(&self) -> broadcast::Receiver<AnimationCue> {
        self.animation_tx.subscribe()
    }

    /// User closed the banner.
    pub fn dismiss(&self) {
        if self.command_tx.send(Command::Dismiss).is_err() {
            tracing::debug!("Dismiss ignored: connectivity monitor already stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the monitor and wait until its listener and timer are released.
    pub async fn teardown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Connectivity monitor task failed: {e}");
            }
        }
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Worker {
    policy: ReachabilityPolicy,
    machine: AlertMachine,
    dwell: Option<(u64, Pin<Box<Sleep>>)>,
    view_tx: watch::Sender<AlertView>,
    animation_tx: broadcast::Sender<AnimationCue>,
}

impl Worker {
    async fn run(
        mut self,
        source: Arc<dyn ConnectivitySource>,
        mut commands: mpsc::UnboundedReceiver<Command>,
        cancel: CancellationToken,
    ) {
        let mut subscription = match source.subscribe() {
            Ok(sub) => Some(sub),
            Err(e) => {
                tracing::error!("Connectivity subscription failed, relying on snapshot only: {e}");
                None
            }
        };
        let mut initial = Some(source.fetch());

        loop {
            let input = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                Some(command) = commands.recv() => match command {
                    Command::Dismiss => Input::Dismiss,
                },
                id = wait_dwell(&mut self.dwell) => {
                    self.dwell = None;
                    Input::DwellElapsed(id)
                }
                result = wait_initial(&mut initial), if initial.is_some() => {
                    initial = None;
                    let usable = match result {
                        Ok(raw) => self.policy.is_usable(raw),
                        Err(e) => {
                            tracing::warn!("Initial connectivity fetch failed, assuming offline: {e}");
                            false
                        }
                    };
                    Input::Initial(usable)
                }
                event = next_event(&mut subscription), if subscription.is_some() => match event {
                    Some(raw) => {
                        let usable = self.policy.is_usable(raw);
                        tracing::debug!(
                            is_connected = raw.is_connected,
                            is_internet_reachable = ?raw.is_internet_reachable,
                            was_usable = ?self.machine.previous_usable(),
                            usable,
                            "Connectivity changed"
                        );
                        Input::Changed(usable)
                    }
                    None => {
                        tracing::warn!("Connectivity source closed its subscription");
                        subscription = None;
                        continue;
                    }
                },
            };

            self.apply(input);
        }

        drop(subscription);
        self.dwell = None;
        tracing::info!("Connectivity monitor stopped");
    }

    fn apply(&mut self, input: Input) {
        for effect in self.machine.apply(input) {
            match effect {
                Effect::StartDwell(id) => {
                    self.dwell = Some((id, Box::pin(sleep(RESTORED_DWELL))));
                }
                Effect::CancelDwell => self.dwell = None,
                Effect::Animate(cue) => {
                    // No receivers is fine: presentation may only watch the view.
                    let _ = self.animation_tx.send(cue);
                }
            }
        }

        let next = self.machine.view();
        self.view_tx.send_if_modified(|view| {
            if *view == next {
                return false;
            }
            tracing::debug!(state = ?next.state, visible = next.visible, "Connectivity alert updated");
            *view = next;
            true
        });
    }
}

async fn wait_dwell(dwell: &mut Option<(u64, Pin<Box<Sleep>>)>) -> u64 {
    match dwell {
        Some((id, timer)) => {
            timer.as_mut().await;
            *id
        }
        None => pending().await,
    }
}

async fn wait_initial(
    initial: &mut Option<BoxFuture<'_, crate::Result<RawConnectivity>>>,
) -> crate::Result<RawConnectivity> {
    match initial {
        Some(fetch) => fetch.await,
        None => pending().await,
    }
}

async fn next_event(subscription: &mut Option<Subscription>) -> Option<RawConnectivity> {
    match subscription {
        Some(sub) => sub.recv().await,
        None => pending().await,
    }
}
