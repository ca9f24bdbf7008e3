//! Change notification channel.
//!
//! Listeners are plain channel receivers. The document keeps the sender half
//! and drops it once the receiver goes away.

use tokio::sync::mpsc;

use crate::NodeId;

/// A value change on a form control, raised by user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Control that changed.
    pub target: NodeId,
    /// Control value after the change.
    pub value: String,
}

/// Receiving end of a change subscription.
#[derive(Debug)]
pub struct ChangeListener {
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
}

impl ChangeListener {
    pub(crate) fn channel() -> (mpsc::UnboundedSender<ChangeEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// Take the next queued change, if any.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next change.
    ///
    /// Returns `None` once the element has been removed from its document.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }

    /// Drain every queued change.
    pub fn drain(&mut self) -> Vec<ChangeEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
