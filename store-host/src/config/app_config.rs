//! Runtime application configuration loaded from the environment.

use std::time::Duration;

use connectivity_monitor::ReachabilityPolicy;
use serde::Serialize;

use super::defaults::{self, DEFAULT_SETTINGS};
use super::validation::validate_setting;

/// Where floating overlay requests go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayBackend {
    /// Rendered by UI clients listening on the event bus.
    Events,
    /// No overlay on this host.
    None,
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub probe_addr: String,
    pub probe_interval: Duration,
    pub probe_timeout: Duration,
    pub probe_reachability: bool,
    pub reachability_policy: ReachabilityPolicy,
    pub overlay_backend: OverlayBackend,
    pub overlay_permission_granted: bool,
    pub notification_platform: String,
    pub event_bus_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Load configuration from process environment variables over defaults.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from `lookup`, falling back to the default for
    /// any key that is unset or fails validation.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> String {
            let fallback = defaults::get_default(key).unwrap_or_default();
            match lookup(key) {
                Some(value) if !value.is_empty() => match validate_setting(key, &value) {
                    Ok(()) => value,
                    Err(e) => {
                        tracing::warn!("Invalid {key}={value:?} ({e}), using default {fallback:?}");
                        fallback.to_string()
                    }
                },
                _ => fallback.to_string(),
            }
        };

        Self {
            probe_addr: g("CONNECTIVITY_PROBE_ADDR"),
            probe_interval: Duration::from_secs(parse_u64(
                &g("CONNECTIVITY_PROBE_INTERVAL_SECS"),
                5,
            )),
            probe_timeout: Duration::from_millis(parse_u64(
                &g("CONNECTIVITY_PROBE_TIMEOUT_MS"),
                1500,
            )),
            probe_reachability: g("CONNECTIVITY_PROBE_REACHABILITY") == "true",
            reachability_policy: match g("CONNECTIVITY_INDETERMINATE_POLICY").as_str() {
                "unusable" => ReachabilityPolicy::IndeterminateIsUnusable,
                _ => ReachabilityPolicy::IndeterminateIsUsable,
            },
            overlay_backend: match g("OVERLAY_BACKEND").as_str() {
                "none" => OverlayBackend::None,
                _ => OverlayBackend::Events,
            },
            overlay_permission_granted: g("OVERLAY_PERMISSION_GRANTED") == "true",
            notification_platform: g("NOTIFICATION_PLATFORM"),
            event_bus_capacity: parse_u64(&g("EVENT_BUS_CAPACITY"), 256) as usize,
        }
    }

    /// Keys that were overridden from their defaults, for the startup log.
    pub fn overridden_keys(lookup: impl Fn(&str) -> Option<String>) -> Vec<&'static str> {
        defaults::keys()
            .filter(|&key| {
                let default = DEFAULT_SETTINGS.get(key).map(|d| d.default);
                lookup(key).is_some_and(|v| Some(v.as_str()) != default)
            })
            .collect()
    }
}

fn parse_u64(s: &str, default: u64) -> u64 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}
