//! Headless store host: wires connectivity monitoring, the floating presence
//! overlay and the notification permission flow to a UI event bus.

pub mod app;
pub mod background;
pub mod bootstrap;
pub mod config;
pub mod console;
pub mod events;
pub mod platform;
pub mod shutdown;

pub use bootstrap::{init_foundation, spawn_background_tasks};
