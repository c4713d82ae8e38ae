use std::sync::Arc;

use serde::Serialize;
use tokio::sync::OnceCell;

use crate::platform::{
    EXPLICIT_GRANT_MIN_API_LEVEL, NotificationPlatform, POST_NOTIFICATIONS,
    RuntimePermissionResult, RuntimePermissions, UnifiedAuthorization,
};
use crate::prompt::{ExplanatoryPrompt, PermissionRationale, Prompter};

#[cfg(test)]
mod tests;

/// Outcome of the permission flow for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionDecision {
    Granted,
    Denied,
    /// The platform needs no explicit grant. Treated as granted.
    NotApplicable,
}

impl PermissionDecision {
    pub const fn allows_notifications(self) -> bool {
        !matches!(self, Self::Denied)
    }
}

/// Runs the notification permission flow once and remembers the outcome.
pub struct PermissionOrchestrator {
    platform: NotificationPlatform,
    prompter: Arc<dyn Prompter>,
    decision: OnceCell<PermissionDecision>,
}

impl PermissionOrchestrator {
    pub fn new(platform: NotificationPlatform, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            platform,
            prompter,
            decision: OnceCell::new(),
        }
    }

    /// Resolve the permission, asking the OS at most once.
    ///
    /// Concurrent callers wait for the same in-flight flow. Platform failures
    /// are logged and resolve to `Denied`.
    pub async fn ensure_notification_permission(&self) -> PermissionDecision {
        *self.decision.get_or_init(|| self.run_flow()).await
    }

    pub fn platform(&self) -> &NotificationPlatform {
        &self.platform
    }

    /// The decision if the flow already finished.
    pub fn decision(&self) -> Option<PermissionDecision> {
        self.decision.get().copied()
    }

    async fn run_flow(&self) -> PermissionDecision {
        tracing::info!(platform = self.platform.family(), "Checking notification permission");
        let decision = match &self.platform {
            NotificationPlatform::Unified(auth) => self.unified(auth.as_ref()).await,
            NotificationPlatform::VersionGated {
                api_level,
                permissions,
            } => self.version_gated(*api_level, permissions.as_ref()).await,
            NotificationPlatform::Unrestricted => PermissionDecision::NotApplicable,
        };

        if decision == PermissionDecision::Denied {
            tracing::warn!("Notification permission denied");
            self.prompter.show(&ExplanatoryPrompt::ENABLE_NOTIFICATIONS);
        } else {
            tracing::info!(?decision, "Notification permission resolved");
        }
        decision
    }

    async fn unified(&self, auth: &dyn UnifiedAuthorization) -> PermissionDecision {
        match auth.request_authorization().await {
            Ok(status) if status.is_enabled() => PermissionDecision::Granted,
            Ok(status) => {
                tracing::debug!(?status, "Notification authorization not enabled");
                PermissionDecision::Denied
            }
            Err(e) => {
                tracing::error!("Error checking notification permission: {e}");
                PermissionDecision::Denied
            }
        }
    }

    async fn version_gated(
        &self,
        api_level: u32,
        permissions: &dyn RuntimePermissions,
    ) -> PermissionDecision {
        if api_level < EXPLICIT_GRANT_MIN_API_LEVEL {
            tracing::debug!(api_level, "No explicit notification grant required");
            return PermissionDecision::NotApplicable;
        }
        if !permissions.is_known(POST_NOTIFICATIONS) {
            tracing::warn!(
                api_level,
                "Platform does not know {POST_NOTIFICATIONS}, skipping request"
            );
            return PermissionDecision::NotApplicable;
        }

        match permissions
            .request(POST_NOTIFICATIONS, &PermissionRationale::ORDER_NOTIFICATIONS)
            .await
        {
            Ok(RuntimePermissionResult::Granted) => PermissionDecision::Granted,
            Ok(result) => {
                tracing::debug!(?result, "Notification permission request not granted");
                PermissionDecision::Denied
            }
            Err(e) => {
                tracing::error!("Error requesting notification permission: {e}");
                PermissionDecision::Denied
            }
        }
    }
}
