//! Host-side implementations of the platform contracts.

pub mod overlay;
pub mod probe;
pub mod prompter;

pub use overlay::EventBusOverlay;
pub use probe::{NetworkProbe, Probe, ProbeConnectivitySource};
pub use prompter::BusPrompter;
