//! UI event bus message types and helpers.
//!
//! Every message is a JSON object `{"type": ..., "data": ..., "timestamp": ...}`
//! sent as a string on the shared broadcast bus.

use serde::Serialize;
use serde_json::json;
use tokio::sync::broadcast;

// -- Event name constants --

pub const CONNECTIVITY_ALERT: &str = "connectivity_alert";
pub const CONNECTIVITY_ANIMATION: &str = "connectivity_animation";
pub const OVERLAY_SHOW: &str = "overlay_show";
pub const OVERLAY_UPDATE: &str = "overlay_update";
pub const OVERLAY_HIDE: &str = "overlay_hide";
pub const OVERLAY_CLICKED: &str = "overlay_clicked";
pub const NOTIFICATION_PERMISSION: &str = "notification_permission";
pub const NOTIFICATION_PROMPT: &str = "notification_prompt";
pub const PRESENCE_CHANGED: &str = "presence_changed";

// -- Payload types --

/// What a UI client needs to draw the floating overlay.
#[derive(Debug, Clone, Serialize)]
pub struct OverlayPayload {
    pub status: &'static str,
    pub is_store_open: bool,
    pub order_count: u32,
    pub orders_label: String,
    pub highlight: bool,
    pub pulses: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PermissionPayload {
    pub decision: notify_permission::PermissionDecision,
    pub platform: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PresencePayload {
    pub lifecycle: presence_overlay::AppLifecycle,
    pub store_open: bool,
    pub order_count: u32,
}

/// Publish `data` under `event_type`. Having no subscribers is not an error.
pub fn publish(bus: &broadcast::Sender<String>, event_type: &str, data: impl Serialize) {
    let msg = json!({
        "type": event_type,
        "data": data,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    if bus.send(msg.to_string()).is_err() {
        tracing::trace!(event_type, "No UI subscribers for event");
    }
}
