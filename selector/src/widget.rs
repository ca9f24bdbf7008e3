//! The selector widget.
//!
//! A [`Selector`] owns a control element and a collection. Every time the
//! collection syncs, the selector disables the control, tears down its
//! options, rebuilds them from the current records, derives the selected
//! value and re-enables the control.
//!
//! Collaborator events arrive by message passing: call
//! [`Selector::process_events`] from a synchronous loop or await
//! [`Selector::next_event`].

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::collection::{Collection, CollectionEvent};
use crate::config::SelectorOptions;
use crate::event::{Emitter, SelectorEvent, Subscription};
use crate::model::{Record, Value};
use crate::option::{OptionEntry, OptionGroup, OptionGroupNode, OptionNode};
use crate::resolve::{DEFAULT_KEY_FIELD, resolve_key, resolve_value};
use crate::target::{ChangeSource, RenderTarget};

/// Marker class of the static text shown in place of a single option.
pub const SINGLE_ITEM_CLASS: &str = "selector-with-single-item";

const SINGLE_ITEM_CLASSES: &str = "selector-with-single-item form-control-static";

/// Callback invoked on every selection change with the value and the
/// matching record.
pub type SelectionCallback = Box<dyn FnMut(&str, Option<&Record>) + Send>;

/// Unique identifier for a selector instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectorId(usize);

impl SelectorId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for SelectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__selector_{}", self.0)
    }
}

/// How the control is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Interactive dropdown.
    #[default]
    Normal,
    /// Control hidden behind static text for a single record.
    SingleAsText,
}

/// Snapshot of a selector's observable state.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorState {
    pub disabled: bool,
    pub current_value: String,
    pub mode: Mode,
    /// Rendered groups, empty unless grouping.
    pub groups: Vec<OptionGroup>,
    /// Rendered flat entries, empty when grouping.
    pub entries: Vec<OptionEntry>,
}

/// Builder for [`Selector`].
pub struct SelectorBuilder<C: Collection, T: RenderTarget> {
    collection: C,
    el: T,
    options: SelectorOptions,
    on_selection_change: Option<SelectionCallback>,
}

impl<C: Collection, T: RenderTarget> SelectorBuilder<C, T> {
    pub fn options(mut self, options: SelectorOptions) -> Self {
        self.options = options;
        self
    }

    /// Call `f(value, record)` on every selection change.
    pub fn on_selection_change(
        mut self,
        f: impl FnMut(&str, Option<&Record>) + Send + 'static,
    ) -> Self {
        self.on_selection_change = Some(Box::new(f));
        self
    }

    /// Build the selector: disable the control, subscribe to the collection
    /// and the control, and populate if `auto_populate` is set.
    pub fn build(self) -> Selector<C, T> {
        let subscription = self.collection.subscribe();
        let changes = self.el.on_change();
        let mut selector = Selector {
            id: SelectorId::new(),
            options: self.options,
            collection: self.collection,
            el: self.el,
            subscription,
            changes,
            option_nodes: Vec::new(),
            group_nodes: Vec::new(),
            text_node: None,
            mode: Mode::Normal,
            disabled: false,
            events: Emitter::new(),
            on_selection_change: self.on_selection_change,
        };
        selector.set_disabled(true);
        log::debug!("{} created", selector.id);

        if selector.options.auto_populate {
            selector.populate();
        }
        selector
    }
}

/// A dropdown kept in sync with a collection.
///
/// # Example
///
/// ```
/// use selectdom::Document;
/// use selector::prelude::*;
///
/// let doc = Document::new();
/// let form = doc.create_element("form");
/// let control = doc.create_element("select");
/// form.append_child(&control).unwrap();
///
/// let records = MemoryCollection::with_records([
///     Record::new().set("key", "be").set("value", "Belgium"),
///     Record::new().set("key", "nl").set("value", "Netherlands"),
/// ]);
/// let mut countries = Selector::builder(records, control)
///     .options(SelectorOptions::new().data_provided().selected_id("nl"))
///     .build();
///
/// countries.populate();
/// assert_eq!(countries.value(), "nl");
/// assert!(!countries.is_disabled());
/// ```
pub struct Selector<C: Collection, T: RenderTarget> {
    id: SelectorId,
    options: SelectorOptions,
    collection: C,
    el: T,
    subscription: Subscription<CollectionEvent>,
    changes: Option<T::Listener>,
    option_nodes: Vec<OptionNode<T>>,
    group_nodes: Vec<OptionGroupNode<T>>,
    text_node: Option<T>,
    mode: Mode,
    disabled: bool,
    events: Emitter<SelectorEvent>,
    on_selection_change: Option<SelectionCallback>,
}

impl<C: Collection, T: RenderTarget> Selector<C, T> {
    /// Start building a selector rendering `collection` into the `el` control.
    pub fn builder(collection: C, el: T) -> SelectorBuilder<C, T> {
        SelectorBuilder {
            collection,
            el,
            options: SelectorOptions::default(),
            on_selection_change: None,
        }
    }

    pub fn id(&self) -> SelectorId {
        self.id
    }

    pub fn options(&self) -> &SelectorOptions {
        &self.options
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// The control element. Rendering is incremental, so this is all
    /// `render` has to return.
    pub fn render(&self) -> &T {
        &self.el
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn option_nodes(&self) -> &[OptionNode<T>] {
        &self.option_nodes
    }

    pub fn group_nodes(&self) -> &[OptionGroupNode<T>] {
        &self.group_nodes
    }

    /// Subscribe to [`SelectorEvent`]s.
    pub fn subscribe(&mut self) -> Subscription<SelectorEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> SelectorState {
        SelectorState {
            disabled: self.disabled,
            current_value: self.value(),
            mode: self.mode,
            groups: self.group_nodes.iter().map(OptionGroupNode::group).collect(),
            entries: self
                .option_nodes
                .iter()
                .filter_map(|o| o.entry().cloned())
                .collect(),
        }
    }

    // -------------------------------------------------------------------------
    // Population
    // -------------------------------------------------------------------------

    /// Disable the control and (re)load options.
    ///
    /// With `data_provided` the options are rebuilt right away. Otherwise the
    /// collection is asked to fetch and the rebuild happens when its `Synced`
    /// event is processed. Earlier fetches are not cancelled.
    pub fn populate(&mut self) {
        self.set_disabled(true);
        if self.options.data_provided {
            self.add_options();
        } else {
            log::debug!("{} fetching from '{}'", self.id, self.collection.url());
            self.collection.fetch();
        }
    }

    /// Point the collection at `{base_url}/{endpoint}` and populate.
    pub fn populate_from(&mut self, endpoint: &str) {
        let url = format!("{}/{}", self.options.base_url, endpoint);
        self.collection.set_url(&url);
        self.populate();
    }

    /// Tear down static text and all options. Idempotent.
    pub fn reset(&mut self) {
        self.clear_text_element_if_present();

        for option in &mut self.option_nodes {
            option.remove();
        }
        for group in &mut self.group_nodes {
            group.reset();
            group.remove();
        }

        self.option_nodes.clear();
        self.group_nodes.clear();
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        if disabled {
            self.el.set_attribute("disabled", "disabled");
        } else {
            self.el.remove_attribute("disabled");
        }
        self.disabled = disabled;
    }

    fn add_options(&mut self) {
        self.reset();

        let records = self.collection.records();
        if let Some(attribute) = self.options.group_by_attribute.clone() {
            self.add_option_groups(&attribute);
        } else {
            for record in &records {
                self.add_single_option(record.clone());
            }
        }
        log::debug!(
            "{} rebuilt {} options in {} groups",
            self.id,
            records.len(),
            self.group_nodes.len()
        );

        if let [record] = records.as_slice() {
            if self.options.single_option_as_text {
                self.render_option_as_text(record);
            }
            let key = resolve_key(record, self.options.model_attributes.key.as_ref());
            self.set_value(&key.to_string());
        } else if let Some(selected_id) = self.options.selected_id.take() {
            // Only valid for the first population; later fetches may not
            // contain it.
            self.set_value(&selected_id);
        } else {
            self.trigger_selection_change(None);
        }

        self.set_disabled(false);
    }

    fn add_option_groups(&mut self, attribute: &str) {
        let groups = self
            .collection
            .group_by(&|record: &Record| record.get_or_null(attribute).to_string());
        for group in groups {
            let mut node = OptionGroupNode::new(group.label, group.records);
            self.el
                .append_child(node.render(&self.el, &self.options.model_attributes));
            self.group_nodes.push(node);
        }
    }

    fn add_single_option(&mut self, record: Record) {
        let mut node = OptionNode::new(record);
        self.el
            .append_child(node.render(&self.el, &self.options.model_attributes));
        self.option_nodes.push(node);
    }

    fn render_option_as_text(&mut self, record: &Record) {
        let label = resolve_value(record, self.options.model_attributes.value.as_ref());

        let text = self.el.create_element("span");
        text.add_class(SINGLE_ITEM_CLASSES);
        text.set_text(&label.to_string());
        self.el.insert_before(&text);

        // A control without a parent has nowhere to put the text
        if self.el.siblings_with_class(SINGLE_ITEM_CLASS).is_empty() {
            log::debug!("{} cannot place single-item text, keeping control", self.id);
            text.remove();
            return;
        }
        self.text_node = Some(text);
        self.el.hide();
        self.mode = Mode::SingleAsText;
    }

    fn clear_text_element_if_present(&mut self) {
        if let Some(text) = self.text_node.take() {
            text.remove();
        }
        for sibling in self.el.siblings_with_class(SINGLE_ITEM_CLASS) {
            sibling.remove();
        }
        self.el.show();
        self.mode = Mode::Normal;
    }

    // -------------------------------------------------------------------------
    // Value
    // -------------------------------------------------------------------------

    /// The control's current value.
    pub fn value(&self) -> String {
        self.el.value()
    }

    /// Assign `value` and announce it, whether or not the control changed.
    ///
    /// An empty value announces whatever the control then reports.
    pub fn set_value(&mut self, value: &str) {
        self.el.set_value(value);
        self.trigger_selection_change(Some(value));
    }

    fn trigger_selection_change(&mut self, selected: Option<&str>) {
        let value = match selected {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => self.value(),
        };
        let record = self.find_record(&value);
        log::debug!(
            "{} selection change '{}' (matched: {})",
            self.id,
            value,
            record.is_some()
        );

        self.events.emit(SelectorEvent::SelectionChange {
            value: value.clone(),
            record: record.clone(),
        });
        if let Some(callback) = self.on_selection_change.as_mut() {
            callback(&value, record.as_ref());
        }
    }

    /// Record whose key equals `value`.
    fn find_record(&self, value: &str) -> Option<Record> {
        match &self.options.model_attributes.key {
            None => self.collection.find_where(DEFAULT_KEY_FIELD, value),
            Some(spec) => match spec.as_single() {
                Some(field) => self.collection.find_where(field, value),
                None => self.collection.records().into_iter().find(|record| {
                    match resolve_key(record, Some(spec)) {
                        Value::Null => false,
                        key => key.to_string() == value,
                    }
                }),
            },
        }
    }

    // -------------------------------------------------------------------------
    // Event processing
    // -------------------------------------------------------------------------

    fn handle_collection_event(&mut self, event: CollectionEvent) {
        log::debug!("{} collection event {:?}", self.id, event);
        match event {
            CollectionEvent::Synced => self.add_options(),
            CollectionEvent::Reset => self.reset(),
        }
    }

    /// Handle every queued collection event and control change, in that
    /// order. Returns how many were handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.subscription.try_recv() {
            self.handle_collection_event(event);
            handled += 1;
        }
        while self.changes.as_mut().and_then(|c| c.try_next()).is_some() {
            self.trigger_selection_change(None);
            handled += 1;
        }
        handled
    }

    /// Wait for and handle the next collection event or control change.
    ///
    /// Returns `false` once the collection subscription has closed.
    pub async fn next_event(&mut self) -> bool {
        enum Incoming {
            Collection(Option<CollectionEvent>),
            Change(Option<String>),
        }

        let incoming = {
            let subscription = &mut self.subscription;
            let changes = &mut self.changes;
            tokio::select! {
                event = subscription.recv() => Incoming::Collection(event),
                value = async {
                    match changes.as_mut() {
                        Some(listener) => listener.changed().await,
                        None => std::future::pending().await,
                    }
                } => Incoming::Change(value),
            }
        };

        match incoming {
            Incoming::Collection(Some(event)) => {
                self.handle_collection_event(event);
                true
            }
            Incoming::Collection(None) => false,
            Incoming::Change(Some(_)) => {
                self.trigger_selection_change(None);
                true
            }
            Incoming::Change(None) => {
                log::debug!("{} control closed", self.id);
                self.changes = None;
                true
            }
        }
    }
}

impl<C: Collection, T: RenderTarget> Drop for Selector<C, T> {
    fn drop(&mut self) {
        self.collection.unsubscribe(self.subscription.id());
    }
}
