//! Network connectivity alert monitor.
//!
//! Reduces the platform's raw reachability signal into a small alert state
//! machine (no connection / connection restored), with a fixed dwell for the
//! "restored" banner, manual dismissal, and lifecycle-scoped teardown.

pub mod machine;
pub mod monitor;
pub mod reachability;
pub mod source;

// Re-exports for convenience
pub use machine::{
    AlertMachine, AlertVariant, AlertView, AnimationCue, ConnectivityState, Effect, Input,
    RESTORED_DWELL,
};
pub use monitor::ConnectivityMonitor;
pub use reachability::{DEFAULT_REACHABILITY_POLICY, RawConnectivity, ReachabilityPolicy};
pub use source::{ConnectivitySource, Subscription};

/// Errors raised at the connectivity platform boundary.
#[derive(Debug, thiserror::Error)]
pub enum ConnectivityError {
    #[error("Connectivity fetch failed: {0}")]
    Fetch(String),

    #[error("Connectivity subscription failed: {0}")]
    Subscribe(String),
}

/// Result type alias for connectivity operations.
pub type Result<T> = std::result::Result<T, ConnectivityError>;
