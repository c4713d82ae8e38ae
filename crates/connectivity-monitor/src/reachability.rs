//! Raw connectivity snapshots and the "usable" reduction.

use serde::{Deserialize, Serialize};

/// One connectivity report from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawConnectivity {
    /// Link-layer connection present.
    pub is_connected: bool,
    /// Application-layer reachability; `None` when the platform has not decided yet.
    pub is_internet_reachable: Option<bool>,
}

impl RawConnectivity {
    pub const fn new(is_connected: bool, is_internet_reachable: Option<bool>) -> Self {
        Self {
            is_connected,
            is_internet_reachable,
        }
    }

    pub const fn online() -> Self {
        Self::new(true, Some(true))
    }

    pub const fn offline() -> Self {
        Self::new(false, Some(false))
    }
}

/// How an indeterminate reachability flag folds into the usable fact.
///
/// A link that reports connected with `is_internet_reachable == Some(false)`
/// is never usable, whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReachabilityPolicy {
    /// Favor fewer false alarms: undecided reachability counts as usable.
    #[default]
    IndeterminateIsUsable,
    /// Stricter detection: undecided reachability counts as not usable.
    IndeterminateIsUnusable,
}

/// Policy applied by [`crate::ConnectivityMonitor::start`].
pub const DEFAULT_REACHABILITY_POLICY: ReachabilityPolicy = ReachabilityPolicy::IndeterminateIsUsable;

impl ReachabilityPolicy {
    /// Reduce a raw snapshot to the boolean "is usable" fact.
    pub const fn is_usable(self, raw: RawConnectivity) -> bool {
        if !raw.is_connected {
            return false;
        }
        match raw.is_internet_reachable {
            Some(reachable) => reachable,
            None => matches!(self, Self::IndeterminateIsUsable),
        }
    }
}
