//! Node arena shared by every element handle of one document.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::mpsc;

use crate::element::Element;
use crate::event::ChangeEvent;

/// Identifier of a node inside its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which option a `<select>` currently shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Selected {
    /// First enabled option, recomputed whenever options change.
    #[default]
    Default,
    /// Explicitly chosen option.
    Option(NodeId),
    /// An assignment matched nothing.
    Nothing,
}

#[derive(Debug)]
pub(crate) struct Node {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub classes: Vec<String>,
    pub text: String,
    pub hidden: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub selected: Selected,
    pub listeners: Vec<mpsc::UnboundedSender<ChangeEvent>>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: HashMap::new(),
            classes: Vec::new(),
            text: String::new(),
            hidden: false,
            parent: None,
            children: Vec::new(),
            selected: Selected::Default,
            listeners: Vec::new(),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.attributes.contains_key("disabled")
    }

    /// Value an `<option>` submits: its `value` attribute, else its text.
    pub fn option_value(&self) -> String {
        self.attributes
            .get("value")
            .cloned()
            .unwrap_or_else(|| self.text.clone())
    }
}

#[derive(Debug, Default)]
pub(crate) struct Tree {
    pub nodes: HashMap<NodeId, Node>,
    next_id: u64,
}

impl Tree {
    pub fn insert(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(tag));
        id
    }

    /// Detach `id` from its parent, if any.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(&id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != id);
        }
        self.options_changed(parent);
    }

    /// Drop `id` and its whole subtree from the arena.
    pub fn drop_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.drop_subtree(child);
            }
        }
    }

    pub fn is_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.nodes.get(&id).and_then(|n| n.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// Nearest `<select>` at or above `id`.
    pub fn owning_select(&self, mut id: NodeId) -> Option<NodeId> {
        loop {
            let node = self.nodes.get(&id)?;
            if node.tag == "select" {
                return Some(id);
            }
            id = node.parent?;
        }
    }

    /// Descendant `<option>` nodes in tree order.
    pub fn options(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_options(id, &mut out);
        out
    }

    fn collect_options(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        for child in &node.children {
            if let Some(c) = self.nodes.get(child) {
                if c.tag == "option" {
                    out.push(*child);
                } else {
                    self.collect_options(*child, out);
                }
            }
        }
    }

    /// Option a select currently shows, if any.
    pub fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(&select)?;
        match node.selected {
            Selected::Option(id) => Some(id),
            Selected::Nothing => None,
            Selected::Default => self
                .options(select)
                .into_iter()
                .find(|o| self.nodes.get(o).is_some_and(|n| !n.is_disabled())),
        }
    }

    /// Re-run option selection after the option list under `id` changed.
    pub fn options_changed(&mut self, id: NodeId) {
        let Some(select) = self.owning_select(id) else {
            return;
        };
        let current = self.nodes.get(&select).map(|n| n.selected);
        let still_present = match current {
            Some(Selected::Option(opt)) => {
                self.nodes.contains_key(&opt) && self.is_ancestor(select, opt)
            }
            _ => false,
        };
        if !still_present && let Some(node) = self.nodes.get_mut(&select) {
            node.selected = Selected::Default;
        }
    }

    pub fn value(&self, id: NodeId) -> String {
        let Some(node) = self.nodes.get(&id) else {
            return String::new();
        };
        if node.tag == "select" {
            return self
                .selected_option(id)
                .and_then(|o| self.nodes.get(&o))
                .map(Node::option_value)
                .unwrap_or_default();
        }
        node.attributes.get("value").cloned().unwrap_or_default()
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) {
        let is_select = self.nodes.get(&id).is_some_and(|n| n.tag == "select");
        if is_select {
            let matched = self.options(id).into_iter().find(|o| {
                self.nodes
                    .get(o)
                    .is_some_and(|n| n.option_value() == value)
            });
            if let Some(node) = self.nodes.get_mut(&id) {
                node.selected = match matched {
                    Some(opt) => Selected::Option(opt),
                    None => Selected::Nothing,
                };
            }
        } else if let Some(node) = self.nodes.get_mut(&id) {
            node.attributes.insert("value".into(), value.to_string());
        }
    }
}

/// A document owning a tree of nodes.
///
/// Cheap to clone; clones share the same tree.
#[derive(Debug, Clone, Default)]
pub struct Document {
    inner: Arc<RwLock<Tree>>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element with the given tag.
    pub fn create_element(&self, tag: &str) -> Element {
        let id = self.write().insert(tag);
        Element::new(self.clone(), id)
    }

    /// Handle for an existing node.
    pub fn element(&self, id: NodeId) -> Option<Element> {
        self.read()
            .nodes
            .contains_key(&id)
            .then(|| Element::new(self.clone(), id))
    }

    /// Every live node carrying `class`, ordered by id.
    pub fn elements_with_class(&self, class: &str) -> Vec<Element> {
        let tree = self.read();
        let mut ids: Vec<NodeId> = tree
            .nodes
            .iter()
            .filter(|(_, n)| n.classes.iter().any(|c| c == class))
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids.into_iter()
            .map(|id| Element::new(self.clone(), id))
            .collect()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.read().nodes.len()
    }

    /// True when the document holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Tree> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Tree> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
