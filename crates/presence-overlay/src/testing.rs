//! Recording native overlay shared by the crate's tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::BoxFuture;
use tokio::sync::broadcast;

use crate::native::{NativeOverlay, OverlayEvent};
use crate::request::OverlayRequest;
use crate::{OverlayError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Show(OverlayRequest),
    Update(OverlayRequest),
    Hide,
    RequestPermission,
    CheckPermission,
    IsShowing,
}

pub struct RecordingOverlay {
    calls: Mutex<Vec<Call>>,
    permission: AtomicBool,
    grant_on_request: AtomicBool,
    failing: AtomicBool,
    showing: AtomicBool,
    events: broadcast::Sender<OverlayEvent>,
}

impl RecordingOverlay {
    pub fn new(permission: bool) -> Self {
        let (events, _) = broadcast::channel(8);
        Self {
            calls: Mutex::new(Vec::new()),
            permission: AtomicBool::new(permission),
            grant_on_request: AtomicBool::new(true),
            failing: AtomicBool::new(false),
            showing: AtomicBool::new(false),
            events,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn set_permission(&self, granted: bool) {
        self.permission.store(granted, Ordering::SeqCst);
    }

    pub fn set_grant_on_request(&self, grant: bool) {
        self.grant_on_request.store(grant, Ordering::SeqCst);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Overlay torn down outside the bridge, e.g. the OS killed the service.
    pub fn set_showing(&self, showing: bool) {
        self.showing.store(showing, Ordering::SeqCst);
    }

    pub fn click(&self) {
        let _ = self.events.send(OverlayEvent::Clicked);
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if !self.failing.load(Ordering::SeqCst) {
            return Ok(());
        }
        Err(match call {
            Call::RequestPermission => {
                OverlayError::PermissionRequest("settings activity unavailable".into())
            }
            _ => OverlayError::Service("native module crashed".into()),
        })
    }

    /// Drawing without the grant fails on the native side.
    fn require_permission(&self) -> Result<()> {
        if self.permission.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(OverlayError::PermissionDenied)
        }
    }
}

impl NativeOverlay for RecordingOverlay {
    fn show(&self, request: OverlayRequest) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.record(Call::Show(request))?;
            self.require_permission()?;
            self.showing.store(true, Ordering::SeqCst);
            Ok(())
        })
    }

    fn update(&self, request: OverlayRequest) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.record(Call::Update(request))?;
            self.require_permission()
        })
    }

    fn hide(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.record(Call::Hide)?;
            self.showing.store(false, Ordering::SeqCst);
            Ok(())
        })
    }

    fn request_permission(&self) -> BoxFuture<'_, Result<bool>> {
        Box::pin(async move {
            self.record(Call::RequestPermission)?;
            if self.grant_on_request.load(Ordering::SeqCst) {
                self.permission.store(true, Ordering::SeqCst);
            }
            Ok(self.permission.load(Ordering::SeqCst))
        })
    }

    fn check_permission(&self) -> BoxFuture<'_, Result<bool>> {
        Box::pin(async move {
            self.record(Call::CheckPermission)?;
            Ok(self.permission.load(Ordering::SeqCst))
        })
    }

    fn is_showing(&self) -> BoxFuture<'_, Result<bool>> {
        Box::pin(async move {
            self.record(Call::IsShowing)?;
            Ok(self.showing.load(Ordering::SeqCst))
        })
    }

    fn subscribe_events(&self) -> broadcast::Receiver<OverlayEvent> {
        self.events.subscribe()
    }
}
