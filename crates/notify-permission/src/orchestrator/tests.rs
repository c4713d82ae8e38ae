use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::BoxFuture;

use super::*;
use crate::platform::AuthorizationStatus;
use crate::{PermissionError, Result};

#[derive(Default)]
struct CountingPrompter {
    shown: Mutex<Vec<ExplanatoryPrompt>>,
}

impl CountingPrompter {
    fn shown(&self) -> usize {
        self.shown.lock().unwrap().len()
    }
}

impl Prompter for CountingPrompter {
    fn show(&self, prompt: &ExplanatoryPrompt) {
        self.shown.lock().unwrap().push(prompt.clone());
    }
}

struct FixedAuthorization {
    outcome: std::result::Result<AuthorizationStatus, &'static str>,
    calls: AtomicUsize,
}

impl FixedAuthorization {
    fn new(outcome: std::result::Result<AuthorizationStatus, &'static str>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }
}

impl UnifiedAuthorization for FixedAuthorization {
    fn request_authorization(&self) -> BoxFuture<'_, Result<AuthorizationStatus>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Let concurrent callers pile up on the in-flight flow.
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.outcome
                .map_err(|e| PermissionError::Authorization(e.to_string()))
        })
    }
}

struct FixedRuntime {
    known: bool,
    outcome: std::result::Result<RuntimePermissionResult, &'static str>,
    requests: Mutex<Vec<(String, PermissionRationale)>>,
}

impl FixedRuntime {
    fn new(
        known: bool,
        outcome: std::result::Result<RuntimePermissionResult, &'static str>,
    ) -> Arc<Self> {
        Arc::new(Self {
            known,
            outcome,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<(String, PermissionRationale)> {
        self.requests.lock().unwrap().clone()
    }
}

impl RuntimePermissions for FixedRuntime {
    fn is_known(&self, permission: &str) -> bool {
        self.known && permission == POST_NOTIFICATIONS
    }

    fn request(
        &self,
        permission: &str,
        rationale: &PermissionRationale,
    ) -> BoxFuture<'_, Result<RuntimePermissionResult>> {
        self.requests
            .lock()
            .unwrap()
            .push((permission.to_string(), rationale.clone()));
        let outcome = self
            .outcome
            .map_err(|e| PermissionError::Request(e.to_string()));
        Box::pin(async move { outcome })
    }
}

fn orchestrator(platform: NotificationPlatform) -> (PermissionOrchestrator, Arc<CountingPrompter>) {
    let prompter = Arc::new(CountingPrompter::default());
    (
        PermissionOrchestrator::new(platform, prompter.clone()),
        prompter,
    )
}

fn gated(api_level: u32, runtime: &Arc<FixedRuntime>) -> NotificationPlatform {
    NotificationPlatform::VersionGated {
        api_level,
        permissions: runtime.clone(),
    }
}

#[tokio::test]
async fn test_unified_authorized_and_provisional_are_granted() {
    for status in [AuthorizationStatus::Authorized, AuthorizationStatus::Provisional] {
        let (orch, prompter) =
            orchestrator(NotificationPlatform::Unified(FixedAuthorization::new(Ok(status))));
        assert_eq!(orch.ensure_notification_permission().await, PermissionDecision::Granted);
        assert_eq!(prompter.shown(), 0);
    }
}

#[tokio::test]
async fn test_unified_denied_shows_prompt() {
    let (orch, prompter) = orchestrator(NotificationPlatform::Unified(FixedAuthorization::new(
        Ok(AuthorizationStatus::Denied),
    )));
    assert_eq!(orch.ensure_notification_permission().await, PermissionDecision::Denied);
    assert_eq!(prompter.shown(), 1);
    assert_eq!(
        prompter.shown.lock().unwrap()[0],
        ExplanatoryPrompt::ENABLE_NOTIFICATIONS
    );
}

#[tokio::test]
async fn test_unified_failure_is_denied_not_propagated() {
    let (orch, prompter) = orchestrator(NotificationPlatform::Unified(FixedAuthorization::new(
        Err("messaging unavailable"),
    )));
    assert_eq!(orch.ensure_notification_permission().await, PermissionDecision::Denied);
    assert_eq!(prompter.shown(), 1);
}

#[tokio::test]
async fn test_flow_runs_once_for_concurrent_callers() {
    let auth = FixedAuthorization::new(Ok(AuthorizationStatus::Denied));
    let (orch, prompter) = orchestrator(NotificationPlatform::Unified(auth.clone()));
    assert_eq!(orch.decision(), None);

    let (a, b) = tokio::join!(
        orch.ensure_notification_permission(),
        orch.ensure_notification_permission()
    );
    assert_eq!(a, PermissionDecision::Denied);
    assert_eq!(b, PermissionDecision::Denied);
    assert_eq!(orch.ensure_notification_permission().await, PermissionDecision::Denied);

    assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
    assert_eq!(prompter.shown(), 1, "denial is surfaced once");
    assert_eq!(orch.decision(), Some(PermissionDecision::Denied));
}

#[tokio::test]
async fn test_version_gated_requests_with_rationale() {
    let runtime = FixedRuntime::new(true, Ok(RuntimePermissionResult::Granted));
    let (orch, prompter) = orchestrator(gated(EXPLICIT_GRANT_MIN_API_LEVEL, &runtime));

    assert_eq!(orch.ensure_notification_permission().await, PermissionDecision::Granted);
    assert_eq!(prompter.shown(), 0);

    let requests = runtime.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, POST_NOTIFICATIONS);
    assert_eq!(requests[0].1.title, "Notification Permission");
    assert_eq!(requests[0].1.button_neutral, "Ask Me Later");
}

#[tokio::test]
async fn test_version_gated_non_grant_is_denied() {
    for outcome in [
        RuntimePermissionResult::Denied,
        RuntimePermissionResult::NeverAskAgain,
    ] {
        let runtime = FixedRuntime::new(true, Ok(outcome));
        let (orch, prompter) = orchestrator(gated(34, &runtime));
        assert_eq!(orch.ensure_notification_permission().await, PermissionDecision::Denied);
        assert_eq!(prompter.shown(), 1);
    }
}

#[tokio::test]
async fn test_version_gated_below_threshold_skips_request() {
    let runtime = FixedRuntime::new(true, Ok(RuntimePermissionResult::Denied));
    let (orch, prompter) = orchestrator(gated(EXPLICIT_GRANT_MIN_API_LEVEL - 1, &runtime));

    let decision = orch.ensure_notification_permission().await;
    assert_eq!(decision, PermissionDecision::NotApplicable);
    assert!(decision.allows_notifications());
    assert!(runtime.requests().is_empty());
    assert_eq!(prompter.shown(), 0);
}

#[tokio::test]
async fn test_unknown_permission_identifier_skips_request() {
    let runtime = FixedRuntime::new(false, Ok(RuntimePermissionResult::Denied));
    let (orch, prompter) = orchestrator(gated(34, &runtime));

    assert_eq!(
        orch.ensure_notification_permission().await,
        PermissionDecision::NotApplicable
    );
    assert!(runtime.requests().is_empty());
    assert_eq!(prompter.shown(), 0);
}

#[tokio::test]
async fn test_version_gated_failure_is_denied() {
    let runtime = FixedRuntime::new(true, Err("activity not attached"));
    let (orch, prompter) = orchestrator(gated(33, &runtime));
    assert_eq!(orch.ensure_notification_permission().await, PermissionDecision::Denied);
    assert_eq!(prompter.shown(), 1);
}

#[tokio::test]
async fn test_unrestricted_is_not_applicable() {
    let (orch, prompter) = orchestrator(NotificationPlatform::Unrestricted);
    assert_eq!(
        orch.ensure_notification_permission().await,
        PermissionDecision::NotApplicable
    );
    assert_eq!(prompter.shown(), 0);
}
