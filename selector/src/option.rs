//! Option and option-group nodes.
//!
//! Each node projects records into rendered `<option>` / `<optgroup>`
//! elements. Rendered elements are released only by an explicit
//! [`OptionNode::remove`] / [`OptionGroupNode::remove`].

use crate::config::ModelAttributes;
use crate::model::Record;
use crate::resolve::{resolve_key, resolve_value};
use crate::target::RenderTarget;

/// What one rendered option shows.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionEntry {
    /// Submitted value.
    pub key: String,
    /// Visible text.
    pub label: String,
    pub disabled: bool,
    pub record: Record,
}

impl OptionEntry {
    /// Project `record` through `attributes`.
    pub fn from_record(record: &Record, attributes: &ModelAttributes) -> Self {
        Self {
            key: resolve_key(record, attributes.key.as_ref()).to_string(),
            label: resolve_value(record, attributes.value.as_ref()).to_string(),
            disabled: record.is_disabled(),
            record: record.clone(),
        }
    }
}

/// A labelled group of entries.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionGroup {
    pub label: String,
    pub entries: Vec<OptionEntry>,
}

/// One selectable entry bound to one record.
#[derive(Debug)]
pub struct OptionNode<T: RenderTarget> {
    record: Record,
    entry: Option<OptionEntry>,
    el: Option<T>,
}

impl<T: RenderTarget> OptionNode<T> {
    pub fn new(record: Record) -> Self {
        Self {
            record,
            entry: None,
            el: None,
        }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Entry computed by the last render.
    pub fn entry(&self) -> Option<&OptionEntry> {
        self.entry.as_ref()
    }

    /// Rendered element, if rendered and not yet removed.
    pub fn element(&self) -> Option<&T> {
        self.el.as_ref()
    }

    /// Build a detached `<option>` next to `owner` and return it.
    ///
    /// Rendering again releases the previous element first.
    pub fn render(&mut self, owner: &T, attributes: &ModelAttributes) -> &T {
        self.remove();
        let entry = OptionEntry::from_record(&self.record, attributes);

        let el = owner.create_element("option");
        el.set_attribute("value", &entry.key);
        el.set_text(&entry.label);
        if entry.disabled {
            el.set_attribute("disabled", "disabled");
        }

        self.entry = Some(entry);
        self.el.insert(el)
    }

    /// Release the rendered element. Safe to call repeatedly.
    pub fn remove(&mut self) {
        if let Some(el) = self.el.take() {
            el.remove();
        }
        self.entry = None;
    }
}

/// Options sharing one grouping value, under a labelled `<optgroup>`.
#[derive(Debug)]
pub struct OptionGroupNode<T: RenderTarget> {
    label: String,
    records: Vec<Record>,
    options: Vec<OptionNode<T>>,
    el: Option<T>,
}

impl<T: RenderTarget> OptionGroupNode<T> {
    pub fn new(label: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            label: label.into(),
            records,
            options: Vec::new(),
            el: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn options(&self) -> &[OptionNode<T>] {
        &self.options
    }

    pub fn element(&self) -> Option<&T> {
        self.el.as_ref()
    }

    /// Snapshot of the rendered entries.
    pub fn group(&self) -> OptionGroup {
        OptionGroup {
            label: self.label.clone(),
            entries: self
                .options
                .iter()
                .filter_map(|o| o.entry().cloned())
                .collect(),
        }
    }

    /// Build a detached `<optgroup>` holding one option per record, in
    /// record order, and return it.
    pub fn render(&mut self, owner: &T, attributes: &ModelAttributes) -> &T {
        self.reset();
        self.remove();

        let el = owner.create_element("optgroup");
        for record in &self.records {
            let mut option = OptionNode::new(record.clone());
            el.append_child(option.render(owner, attributes));
            self.options.push(option);
        }
        el.set_attribute("label", &self.label);

        self.el.insert(el)
    }

    /// Dispose every child option. Idempotent.
    pub fn reset(&mut self) {
        for option in &mut self.options {
            option.remove();
        }
        self.options.clear();
    }

    /// Release the `<optgroup>` element itself. Idempotent.
    pub fn remove(&mut self) {
        if let Some(el) = self.el.take() {
            el.remove();
        }
    }
}
