//! Connectivity source backed by periodic network probes.
//!
//! Link state is approximated by asking the OS for a UDP route to the probe
//! address (no packet is sent). Internet reachability is a TCP connect with a
//! timeout, or indeterminate when reachability probing is disabled.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use connectivity_monitor::{ConnectivitySource, RawConnectivity, Result, Subscription};
use futures::future::BoxFuture;
use tokio::net::{TcpStream, UdpSocket, lookup_host};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;

const EVENT_CAPACITY: usize = 16;

/// One connectivity measurement.
pub trait Probe: Send + Sync + 'static {
    fn probe(&self) -> BoxFuture<'_, RawConnectivity>;
}

/// Probes the real network.
#[derive(Debug, Clone)]
pub struct NetworkProbe {
    target: String,
    timeout: Duration,
    check_reachability: bool,
}

impl NetworkProbe {
    pub fn new(target: impl Into<String>, timeout: Duration, check_reachability: bool) -> Self {
        Self {
            target: target.into(),
            timeout,
            check_reachability,
        }
    }

    async fn resolve(&self) -> Option<SocketAddr> {
        match timeout(self.timeout, lookup_host(self.target.as_str())).await {
            Ok(Ok(mut addrs)) => addrs.next(),
            Ok(Err(e)) => {
                tracing::debug!("Probe target {} did not resolve: {e}", self.target);
                None
            }
            Err(_) => {
                tracing::debug!("Probe target {} resolution timed out", self.target);
                None
            }
        }
    }

    async fn has_route(addr: SocketAddr) -> bool {
        let bind: SocketAddr = if addr.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        match UdpSocket::bind(bind).await {
            Ok(socket) => socket.connect(addr).await.is_ok(),
            Err(e) => {
                tracing::debug!("Probe socket bind failed: {e}");
                false
            }
        }
    }

    async fn is_reachable(&self, addr: SocketAddr) -> bool {
        matches!(timeout(self.timeout, TcpStream::connect(addr)).await, Ok(Ok(_)))
    }
}

impl Probe for NetworkProbe {
    fn probe(&self) -> BoxFuture<'_, RawConnectivity> {
        Box::pin(async move {
            let Some(addr) = self.resolve().await else {
                return RawConnectivity::offline();
            };
            if !Self::has_route(addr).await {
                return RawConnectivity::offline();
            }
            let reachable = if self.check_reachability {
                Some(self.is_reachable(addr).await)
            } else {
                None
            };
            RawConnectivity::new(true, reachable)
        })
    }
}

/// [`ConnectivitySource`] that polls a [`Probe`] and emits on change.
pub struct ProbeConnectivitySource {
    probe: Arc<dyn Probe>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl ProbeConnectivitySource {
    pub fn new(probe: Arc<dyn Probe>, interval: Duration, shutdown: CancellationToken) -> Self {
        Self {
            probe,
            interval,
            shutdown,
        }
    }

    /// Network-backed source from configuration.
    pub fn from_config(config: &AppConfig, shutdown: CancellationToken) -> Self {
        let probe = NetworkProbe::new(
            config.probe_addr.clone(),
            config.probe_timeout,
            config.probe_reachability,
        );
        Self::new(Arc::new(probe), config.probe_interval, shutdown)
    }
}

impl ConnectivitySource for ProbeConnectivitySource {
    fn fetch(&self) -> BoxFuture<'_, Result<RawConnectivity>> {
        Box::pin(async move { Ok(self.probe.probe().await) })
    }

    fn subscribe(&self) -> Result<Subscription> {
        let (tx, rx) = mpsc::channel(EVENT_CAPACITY);
        let token = self.shutdown.child_token();
        tokio::spawn(poll_loop(
            self.probe.clone(),
            self.interval,
            tx,
            token.clone(),
        ));
        Ok(Subscription::new(rx, move || token.cancel()))
    }
}

async fn sleep_or_cancel(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        biased;
        _ = token.cancelled() => true,
        _ = sleep(duration) => false,
    }
}

async fn poll_loop(
    probe: Arc<dyn Probe>,
    interval: Duration,
    tx: mpsc::Sender<RawConnectivity>,
    token: CancellationToken,
) {
    let mut last: Option<RawConnectivity> = None;
    loop {
        let raw = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            raw = probe.probe() => raw,
        };
        if last != Some(raw) {
            tracing::debug!(?raw, "Connectivity probe changed");
            last = Some(raw);
            if tx.send(raw).await.is_err() {
                break;
            }
        }
        if sleep_or_cancel(&token, interval).await {
            break;
        }
    }
    tracing::debug!("Connectivity probe loop stopped");
}
