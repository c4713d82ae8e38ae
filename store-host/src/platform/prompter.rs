use notify_permission::{ExplanatoryPrompt, Prompter};
use tokio::sync::broadcast;

use crate::events;

/// Surfaces explanatory prompts as UI bus events.
pub struct BusPrompter {
    bus: broadcast::Sender<String>,
}

impl BusPrompter {
    pub fn new(bus: broadcast::Sender<String>) -> Self {
        Self { bus }
    }
}

impl Prompter for BusPrompter {
    fn show(&self, prompt: &ExplanatoryPrompt) {
        tracing::info!(title = prompt.title, "Showing notification prompt");
        events::publish(&self.bus, events::NOTIFICATION_PROMPT, prompt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_published() {
        let (bus, mut rx) = broadcast::channel(4);
        BusPrompter::new(bus).show(&ExplanatoryPrompt::ENABLE_NOTIFICATIONS);

        let msg: serde_json::Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(msg["type"], events::NOTIFICATION_PROMPT);
        assert_eq!(msg["data"]["title"], "Enable Notifications");
        assert_eq!(msg["data"]["button"], "OK");
    }
}
