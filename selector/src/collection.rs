//! Collections of records a selector binds to.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::SelectorError;
use crate::event::{Emitter, Subscription, SubscriptionId};
use crate::model::Record;

/// Lifecycle events emitted by a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEvent {
    /// Records were (re)loaded from the backing source.
    Synced,
    /// The collection was intentionally emptied.
    Reset,
}

/// Records sharing one grouping value.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub label: String,
    pub records: Vec<Record>,
}

/// An ordered, fetchable set of records.
///
/// Implementors provide storage, fetching and event subscription; lookup and
/// grouping have default implementations on top of [`Collection::records`].
pub trait Collection {
    /// Current records, in collection order.
    fn records(&self) -> Vec<Record>;

    /// Start loading records from the backing source.
    ///
    /// Completion is signalled by a [`CollectionEvent::Synced`] event. A
    /// failed fetch emits nothing.
    fn fetch(&self);

    /// Locator the next fetch loads from.
    fn url(&self) -> String;

    fn set_url(&self, url: &str);

    /// Subscribe to lifecycle events.
    fn subscribe(&self) -> Subscription<CollectionEvent>;

    fn unsubscribe(&self, id: SubscriptionId);

    fn len(&self) -> usize {
        self.records().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record at `index`.
    fn at(&self, index: usize) -> Option<Record> {
        self.records().into_iter().nth(index)
    }

    /// First record whose `field`, stringified, equals `value`.
    fn find_where(&self, field: &str, value: &str) -> Option<Record> {
        self.records().into_iter().find(|record| {
            record
                .get(field)
                .is_some_and(|v| !v.is_null() && v.to_string() == value)
        })
    }

    /// Partition records by `key`, groups ordered by first encounter and
    /// records kept in collection order.
    fn group_by(&self, key: &dyn Fn(&Record) -> String) -> Vec<Group> {
        let mut groups: Vec<Group> = Vec::new();
        for record in self.records() {
            let label = key(&record);
            match groups.iter_mut().find(|g| g.label == label) {
                Some(group) => group.records.push(record),
                None => groups.push(Group {
                    label,
                    records: vec![record],
                }),
            }
        }
        groups
    }
}

/// A fetch issued against a [`MemoryCollection`] and not yet settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: u64,
    pub url: String,
}

#[derive(Debug, Default)]
struct MemoryInner {
    records: Vec<Record>,
    url: String,
    pending: Vec<FetchRequest>,
    next_fetch: u64,
    events: Emitter<CollectionEvent>,
}

/// In-memory collection.
///
/// Cheap to clone; clones share the same records and subscribers. Fetches are
/// recorded as pending [`FetchRequest`]s which the owner settles with
/// [`complete_fetch`](Self::complete_fetch) or [`fail_fetch`](Self::fail_fetch),
/// in any order.
///
/// # Example
///
/// ```
/// use selector::{Collection, CollectionEvent, MemoryCollection, Record};
///
/// let countries = MemoryCollection::new();
/// let mut events = countries.subscribe();
///
/// countries.fetch();
/// let request = countries.pending_fetches().remove(0);
/// countries.complete_fetch(request.id, vec![Record::new().set("key", "be")]);
///
/// assert_eq!(events.try_recv(), Some(CollectionEvent::Synced));
/// assert_eq!(countries.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryCollection {
    inner: Arc<RwLock<MemoryInner>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection preloaded with `records`. Emits nothing.
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let collection = Self::new();
        collection.write().records = records.into_iter().collect();
        collection
    }

    /// Collection preloaded from a JSON array of objects.
    pub fn from_json(json: &str) -> Result<Self, SelectorError> {
        let records: Vec<Record> = serde_json::from_str(json)?;
        Ok(Self::with_records(records))
    }

    /// Set the fetch locator (builder pattern).
    pub fn url_is(self, url: impl Into<String>) -> Self {
        self.write().url = url.into();
        self
    }

    /// Replace all records and emit [`CollectionEvent::Synced`].
    pub fn replace(&self, records: impl IntoIterator<Item = Record>) {
        let mut inner = self.write();
        inner.records = records.into_iter().collect();
        log::debug!("collection replaced with {} records", inner.records.len());
        inner.events.emit(CollectionEvent::Synced);
    }

    /// Remove all records and emit [`CollectionEvent::Reset`].
    pub fn clear(&self) {
        let mut inner = self.write();
        inner.records.clear();
        inner.events.emit(CollectionEvent::Reset);
    }

    /// Fetches issued but not yet completed or failed, oldest first.
    pub fn pending_fetches(&self) -> Vec<FetchRequest> {
        self.read().pending.clone()
    }

    /// Settle fetch `id` with `records`, emitting `Synced`.
    ///
    /// Returns `false` if no such fetch is pending.
    pub fn complete_fetch(&self, id: u64, records: impl IntoIterator<Item = Record>) -> bool {
        if !self.take_pending(id) {
            return false;
        }
        self.replace(records);
        true
    }

    /// Drop fetch `id` without emitting anything.
    pub fn fail_fetch(&self, id: u64) -> bool {
        let failed = self.take_pending(id);
        if failed {
            log::debug!("fetch {id} failed");
        }
        failed
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.read().events.len()
    }

    fn take_pending(&self, id: u64) -> bool {
        let mut inner = self.write();
        let before = inner.pending.len();
        inner.pending.retain(|r| r.id != id);
        inner.pending.len() != before
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryInner> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryInner> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Collection for MemoryCollection {
    fn records(&self) -> Vec<Record> {
        self.read().records.clone()
    }

    fn fetch(&self) {
        let mut inner = self.write();
        let request = FetchRequest {
            id: inner.next_fetch,
            url: inner.url.clone(),
        };
        inner.next_fetch += 1;
        log::debug!("fetch {} issued for '{}'", request.id, request.url);
        inner.pending.push(request);
    }

    fn url(&self) -> String {
        self.read().url.clone()
    }

    fn set_url(&self, url: &str) {
        self.write().url = url.to_string();
    }

    fn subscribe(&self) -> Subscription<CollectionEvent> {
        self.write().events.subscribe()
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.write().events.unsubscribe(id);
    }

    fn len(&self) -> usize {
        self.read().records.len()
    }

    fn at(&self, index: usize) -> Option<Record> {
        self.read().records.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryCollection {
        MemoryCollection::from_json(
            r#"[
                {"cat": "A", "key": 1, "value": "x"},
                {"cat": "B", "key": 2, "value": "y"},
                {"cat": "A", "key": 3, "value": "z"},
                {"key": 4, "value": "w"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_group_by_first_encounter() {
        let groups = sample().group_by(&|r: &Record| r.get_or_null("cat").to_string());
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, ["A", "B", ""]);

        let keys: Vec<String> = groups[0]
            .records
            .iter()
            .map(|r| r.get_or_null("key").to_string())
            .collect();
        assert_eq!(keys, ["1", "3"]);
    }

    #[test]
    fn test_find_where_compares_strings() {
        let collection = sample();
        let found = collection.find_where("key", "2").unwrap();
        assert_eq!(found.get_or_null("value").to_string(), "y");
        assert!(collection.find_where("key", "9").is_none());
        assert!(collection.find_where("cat", "").is_none());
    }

    #[test]
    fn test_from_json_keeps_nested_fields() {
        let collection = MemoryCollection::from_json(
            r#"[
                {"key": 1, "value": "x", "tags": ["a"]},
                {"key": 2, "value": "y", "meta": {"region": "EU"}}
            ]"#,
        )
        .unwrap();
        assert_eq!(collection.len(), 2);
        let found = collection.find_where("key", "2").unwrap();
        assert_eq!(found.get_or_null("value").to_string(), "y");
    }

    #[test]
    fn test_positional_access() {
        let collection = sample();
        assert_eq!(collection.len(), 4);
        assert_eq!(
            collection.at(3).map(|r| r.get_or_null("value")),
            Some("w".into())
        );
        assert!(collection.at(4).is_none());
    }

    #[test]
    fn test_fetch_lifecycle() {
        let collection = MemoryCollection::new().url_is("/api/a");
        let mut events = collection.subscribe();

        collection.fetch();
        collection.set_url("/api/b");
        collection.fetch();
        let pending = collection.pending_fetches();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].url, "/api/a");
        assert_eq!(pending[1].url, "/api/b");

        assert!(collection.fail_fetch(pending[0].id));
        assert_eq!(events.try_recv(), None);

        assert!(collection.complete_fetch(pending[1].id, vec![Record::new()]));
        assert!(!collection.complete_fetch(pending[1].id, vec![]));
        assert_eq!(events.try_recv(), Some(CollectionEvent::Synced));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_clear_emits_reset() {
        let collection = sample();
        let mut events = collection.subscribe();
        collection.clear();
        assert_eq!(events.try_recv(), Some(CollectionEvent::Reset));
        assert!(collection.is_empty());
    }

    #[test]
    fn test_unsubscribe() {
        let collection = sample();
        let events = collection.subscribe();
        assert_eq!(collection.subscriber_count(), 1);
        collection.unsubscribe(events.id());
        assert_eq!(collection.subscriber_count(), 0);
    }
}
