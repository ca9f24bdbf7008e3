//! Observer plumbing shared by collections and selectors.
//!
//! An [`Emitter`] fans events out to any number of [`Subscription`]s over
//! unbounded channels. Dropped subscriptions are pruned on the next emit.

use tokio::sync::mpsc;

use crate::model::Record;

/// Events broadcast by a selector.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorEvent {
    /// The chosen value changed, by user action or programmatically.
    SelectionChange {
        /// Selected value.
        value: String,
        /// Record whose key matches `value`, if any.
        record: Option<Record>,
    },
}

/// Identifies a subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Receiving end of an [`Emitter`].
#[derive(Debug)]
pub struct Subscription<E> {
    id: SubscriptionId,
    rx: mpsc::UnboundedReceiver<E>,
}

impl<E> Subscription<E> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Take the next queued event, if any.
    pub fn try_recv(&mut self) -> Option<E> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next event. `None` once the emitter is gone or has
    /// dropped this subscription.
    pub async fn recv(&mut self) -> Option<E> {
        self.rx.recv().await
    }

    /// Drain all queued events.
    pub fn drain(&mut self) -> Vec<E> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Sending side: a list of live subscribers.
#[derive(Debug)]
pub struct Emitter<E> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, mpsc::UnboundedSender<E>)>,
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }
}

impl<E: Clone> Emitter<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&mut self) -> Subscription<E> {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push((id, tx));
        Subscription { id, rx }
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Send `event` to every live subscriber. Returns how many received it.
    pub fn emit(&mut self, event: E) -> usize {
        self.subscribers
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
        self.subscribers.len()
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_all_subscribers() {
        let mut emitter = Emitter::new();
        let mut a = emitter.subscribe();
        let mut b = emitter.subscribe();

        assert_eq!(emitter.emit(1u8), 2);
        assert_eq!(a.try_recv(), Some(1));
        assert_eq!(b.try_recv(), Some(1));
        assert_eq!(a.try_recv(), None);
    }

    #[test]
    fn test_unsubscribe_and_prune() {
        let mut emitter = Emitter::new();
        let a = emitter.subscribe();
        let b = emitter.subscribe();

        assert!(emitter.unsubscribe(a.id()));
        assert!(!emitter.unsubscribe(a.id()));
        drop(b);
        assert_eq!(emitter.emit("gone"), 0);
        assert!(emitter.is_empty());
    }
}
