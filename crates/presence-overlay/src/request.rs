//! Overlay display content.

use serde::{Deserialize, Serialize};

/// Pulses played when the overlay needs attention.
pub const ATTENTION_PULSES: u32 = 3;

/// Desired overlay content at one point in time. The last request wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayRequest {
    pub is_store_open: bool,
    pub order_count: u32,
}

impl OverlayRequest {
    pub const fn new(is_store_open: bool, order_count: u32) -> Self {
        Self {
            is_store_open,
            order_count,
        }
    }

    /// Status badge text.
    pub const fn status_label(&self) -> &'static str {
        if self.is_store_open { "OPEN" } else { "CLOSED" }
    }

    pub fn order_label(&self) -> String {
        format!("Orders: {}", self.order_count)
    }

    /// Pending orders highlight the overlay and pulse it.
    pub const fn needs_attention(&self) -> bool {
        self.order_count > 0
    }
}
