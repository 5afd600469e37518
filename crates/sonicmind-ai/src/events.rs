use std::sync::mpsc;

pub use sonicmind_core::interfaces::AssistantEvent;
use sonicmind_core::interfaces::NotificationSink;

/// Forwards assistant events over a channel to whatever renders them.
pub struct ChannelSink {
    tx: mpsc::Sender<AssistantEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<AssistantEvent>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiving end, for callers that own both.
    pub fn pair() -> (Self, mpsc::Receiver<AssistantEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, event: &AssistantEvent) {
        if self.tx.send(event.clone()).is_err() {
            tracing::debug!("Event receiver dropped: {event:?}");
        }
    }
}
