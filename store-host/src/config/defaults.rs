//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    (
        "CONNECTIVITY_PROBE_ADDR",
        "1.1.1.1:443",
        "host:port used for link and reachability probes",
    ),
    (
        "CONNECTIVITY_PROBE_INTERVAL_SECS",
        "5",
        "Seconds between connectivity probes",
    ),
    (
        "CONNECTIVITY_PROBE_TIMEOUT_MS",
        "1500",
        "TCP connect timeout for the reachability probe",
    ),
    (
        "CONNECTIVITY_PROBE_REACHABILITY",
        "true",
        "Probe internet reachability; when false it is reported as indeterminate",
    ),
    (
        "CONNECTIVITY_INDETERMINATE_POLICY",
        "usable",
        "How undecided internet reachability counts: 'usable' or 'unusable'",
    ),
    (
        "OVERLAY_BACKEND",
        "events",
        "Floating overlay backend: 'events' publishes on the UI bus, 'none' disables it",
    ),
    (
        "OVERLAY_PERMISSION_GRANTED",
        "true",
        "Whether the overlay backend reports draw-over permission as granted",
    ),
    (
        "NOTIFICATION_PLATFORM",
        "unrestricted",
        "Notification permission model of the host platform",
    ),
    (
        "EVENT_BUS_CAPACITY",
        "256",
        "Buffered messages per UI event bus subscriber",
    ),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

/// Setting keys in declaration order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    DEFS.iter().map(|&(key, _, _)| key)
}
