//! Element handles.

use crate::document::{Document, Node, NodeId};
use crate::error::DomError;
use crate::event::{ChangeEvent, ChangeListener};

/// Handle to one node of a [`Document`].
///
/// Handles are cheap to clone and compare equal when they point at the same
/// node. Operations on a removed node fail with [`DomError::NodeNotFound`].
#[derive(Debug, Clone)]
pub struct Element {
    doc: Document,
    id: NodeId,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Element {}

impl Element {
    pub(crate) fn new(doc: Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// True while the node is still part of its document.
    pub fn exists(&self) -> bool {
        self.doc.read().nodes.contains_key(&self.id)
    }

    fn with<R>(&self, f: impl FnOnce(&Node) -> R) -> Result<R, DomError> {
        self.doc
            .read()
            .nodes
            .get(&self.id)
            .map(f)
            .ok_or(DomError::NodeNotFound(self.id))
    }

    fn with_mut<R>(&self, f: impl FnOnce(&mut Node) -> R) -> Result<R, DomError> {
        self.doc
            .write()
            .nodes
            .get_mut(&self.id)
            .map(f)
            .ok_or(DomError::NodeNotFound(self.id))
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    pub fn tag(&self) -> Result<String, DomError> {
        self.with(|n| n.tag.clone())
    }

    pub fn parent(&self) -> Option<Element> {
        self.with(|n| n.parent)
            .ok()
            .flatten()
            .map(|id| Element::new(self.doc.clone(), id))
    }

    pub fn children(&self) -> Vec<Element> {
        self.with(|n| n.children.clone())
            .unwrap_or_default()
            .into_iter()
            .map(|id| Element::new(self.doc.clone(), id))
            .collect()
    }

    /// Append `child` as the last child, moving it if already attached.
    pub fn append_child(&self, child: &Element) -> Result<(), DomError> {
        let mut tree = self.doc.write();
        for id in [self.id, child.id] {
            if !tree.nodes.contains_key(&id) {
                return Err(DomError::NodeNotFound(id));
            }
        }
        if tree.is_ancestor(child.id, self.id) {
            return Err(DomError::Cycle {
                child: child.id,
                parent: self.id,
            });
        }
        tree.detach(child.id);
        if let Some(node) = tree.nodes.get_mut(&child.id) {
            node.parent = Some(self.id);
        }
        if let Some(node) = tree.nodes.get_mut(&self.id) {
            node.children.push(child.id);
        }
        tree.options_changed(self.id);
        Ok(())
    }

    /// Insert `node` as the previous sibling of this element.
    pub fn insert_before(&self, node: &Element) -> Result<(), DomError> {
        let mut tree = self.doc.write();
        for id in [self.id, node.id] {
            if !tree.nodes.contains_key(&id) {
                return Err(DomError::NodeNotFound(id));
            }
        }
        let parent = tree
            .nodes
            .get(&self.id)
            .and_then(|n| n.parent)
            .ok_or(DomError::Detached(self.id))?;
        if tree.is_ancestor(node.id, parent) {
            return Err(DomError::Cycle {
                child: node.id,
                parent,
            });
        }
        tree.detach(node.id);
        if let Some(n) = tree.nodes.get_mut(&node.id) {
            n.parent = Some(parent);
        }
        if let Some(p) = tree.nodes.get_mut(&parent) {
            let index = p
                .children
                .iter()
                .position(|c| *c == self.id)
                .unwrap_or(p.children.len());
            p.children.insert(index, node.id);
        }
        tree.options_changed(parent);
        Ok(())
    }

    /// Detach this element and drop it, with its subtree, from the document.
    ///
    /// Listeners attached to removed nodes are closed.
    pub fn remove(&self) -> Result<(), DomError> {
        let mut tree = self.doc.write();
        if !tree.nodes.contains_key(&self.id) {
            return Err(DomError::NodeNotFound(self.id));
        }
        tree.detach(self.id);
        tree.drop_subtree(self.id);
        log::trace!("removed node {}", self.id);
        Ok(())
    }

    /// Siblings (excluding self) carrying `class`, in document order.
    pub fn siblings_with_class(&self, class: &str) -> Vec<Element> {
        let tree = self.doc.read();
        let Some(parent) = tree.nodes.get(&self.id).and_then(|n| n.parent) else {
            return Vec::new();
        };
        let Some(parent) = tree.nodes.get(&parent) else {
            return Vec::new();
        };
        parent
            .children
            .iter()
            .filter(|id| **id != self.id)
            .filter(|id| {
                tree.nodes
                    .get(id)
                    .is_some_and(|n| n.classes.iter().any(|c| c == class))
            })
            .map(|id| Element::new(self.doc.clone(), *id))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Attributes, classes, text, visibility
    // -------------------------------------------------------------------------

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.with(|n| n.attributes.get(name).cloned()).ok().flatten()
    }

    pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
        self.with_mut(|n| {
            n.attributes.insert(name.to_string(), value.to_string());
        })
    }

    pub fn remove_attribute(&self, name: &str) -> Result<(), DomError> {
        self.with_mut(|n| {
            n.attributes.remove(name);
        })
    }

    pub fn add_class(&self, class: &str) -> Result<(), DomError> {
        self.with_mut(|n| {
            for c in class.split_whitespace() {
                if !n.classes.iter().any(|existing| existing == c) {
                    n.classes.push(c.to_string());
                }
            }
        })
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.with(|n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn text(&self) -> String {
        self.with(|n| n.text.clone()).unwrap_or_default()
    }

    pub fn set_text(&self, text: &str) -> Result<(), DomError> {
        self.with_mut(|n| n.text = text.to_string())
    }

    pub fn hide(&self) -> Result<(), DomError> {
        self.with_mut(|n| n.hidden = true)
    }

    pub fn show(&self) -> Result<(), DomError> {
        self.with_mut(|n| n.hidden = false)
    }

    pub fn is_hidden(&self) -> bool {
        self.with(|n| n.hidden).unwrap_or(false)
    }

    pub fn is_disabled(&self) -> bool {
        self.with(Node::is_disabled).unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Form values
    // -------------------------------------------------------------------------

    /// Current value.
    ///
    /// For a `<select>` this is the value of the shown option: the explicit
    /// choice, else the first enabled option, else the empty string.
    pub fn value(&self) -> String {
        self.doc.read().value(self.id)
    }

    /// Assign a value without raising a change event.
    ///
    /// On a `<select>` this selects the first option with a matching value,
    /// disabled or not. No match leaves nothing selected.
    pub fn set_value(&self, value: &str) -> Result<(), DomError> {
        let mut tree = self.doc.write();
        if !tree.nodes.contains_key(&self.id) {
            return Err(DomError::NodeNotFound(self.id));
        }
        tree.set_value(self.id, value);
        Ok(())
    }

    /// Descendant `<option>` elements in document order.
    pub fn options(&self) -> Vec<Element> {
        self.doc
            .read()
            .options(self.id)
            .into_iter()
            .map(|id| Element::new(self.doc.clone(), id))
            .collect()
    }

    /// Subscribe to user-driven changes of this control.
    pub fn on_change(&self) -> Result<ChangeListener, DomError> {
        let (tx, listener) = ChangeListener::channel();
        self.with_mut(|n| n.listeners.push(tx))?;
        Ok(listener)
    }

    /// Simulate a user picking `value`: assign it, then notify listeners.
    pub fn choose(&self, value: &str) -> Result<(), DomError> {
        self.set_value(value)?;
        self.dispatch_change()
    }

    /// Notify change listeners with the current value.
    pub fn dispatch_change(&self) -> Result<(), DomError> {
        let value = self.value();
        let target = self.id;
        self.with_mut(|n| {
            n.listeners.retain(|tx| {
                tx.send(ChangeEvent {
                    target,
                    value: value.clone(),
                })
                .is_ok()
            });
        })
    }
}
