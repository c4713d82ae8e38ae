//! Platform permission APIs.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::prompt::PermissionRationale;

/// First API level that requires an explicit runtime grant to post notifications.
pub const EXPLICIT_GRANT_MIN_API_LEVEL: u32 = 33;

/// Runtime permission identifier for posting notifications.
pub const POST_NOTIFICATIONS: &str = "android.permission.POST_NOTIFICATIONS";

/// Outcome of the unified authorization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    NotDetermined,
    Denied,
    Authorized,
    Provisional,
}

impl AuthorizationStatus {
    /// Provisional delivery counts as enabled.
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Authorized | Self::Provisional)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimePermissionResult {
    Granted,
    Denied,
    NeverAskAgain,
}

/// Platform family with a single authorization call.
pub trait UnifiedAuthorization: Send + Sync {
    fn request_authorization(&self) -> BoxFuture<'_, Result<AuthorizationStatus>>;
}

/// Platform family with granular runtime permissions.
pub trait RuntimePermissions: Send + Sync {
    /// Whether this platform build knows the permission identifier at all.
    fn is_known(&self, permission: &str) -> bool;

    fn request(
        &self,
        permission: &str,
        rationale: &PermissionRationale,
    ) -> BoxFuture<'_, Result<RuntimePermissionResult>>;
}

/// How notification permission works on the running platform.
#[derive(Clone)]
pub enum NotificationPlatform {
    Unified(Arc<dyn UnifiedAuthorization>),
    VersionGated {
        api_level: u32,
        permissions: Arc<dyn RuntimePermissions>,
    },
    /// No explicit grant exists (desktop, headless).
    Unrestricted,
}

impl NotificationPlatform {
    pub const fn family(&self) -> &'static str {
        match self {
            Self::Unified(_) => "unified",
            Self::VersionGated { .. } => "version_gated",
            Self::Unrestricted => "unrestricted",
        }
    }
}

impl fmt::Debug for NotificationPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionGated { api_level, .. } => f
                .debug_struct("VersionGated")
                .field("api_level", api_level)
                .finish_non_exhaustive(),
            other => f.write_str(other.family()),
        }
    }
}
