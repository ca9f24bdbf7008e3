//! Render-target seam between the selector and whatever hosts its markup.

use std::future::Future;

use selectdom::{ChangeListener, DomError, Element};

/// A mountable node the selector renders into.
///
/// Operations are infallible from the selector's point of view: a target
/// that cannot honour one logs it and carries on.
pub trait RenderTarget: Clone {
    /// Change notifications for a control.
    type Listener: ChangeSource;

    /// Create a detached node owned by the same document.
    fn create_element(&self, tag: &str) -> Self;

    fn append_child(&self, child: &Self);

    /// Detach and release this node.
    fn remove(&self);

    fn hide(&self);

    fn show(&self);

    fn value(&self) -> String;

    fn set_value(&self, value: &str);

    fn set_attribute(&self, name: &str, value: &str);

    fn remove_attribute(&self, name: &str);

    fn set_text(&self, text: &str);

    fn add_class(&self, class: &str);

    /// Siblings carrying the marker `class`.
    fn siblings_with_class(&self, class: &str) -> Vec<Self>;

    /// Insert `node` as the previous sibling of this node.
    fn insert_before(&self, node: &Self);

    /// Subscribe to user-driven value changes.
    fn on_change(&self) -> Option<Self::Listener>;
}

/// Source of control change notifications, yielding the new value.
pub trait ChangeSource {
    fn try_next(&mut self) -> Option<String>;

    /// Wait for the next change. `None` when the control is gone.
    fn changed(&mut self) -> impl Future<Output = Option<String>>;
}

fn warn_on_err(op: &str, result: Result<(), DomError>) {
    if let Err(e) = result {
        log::warn!("render target {op} failed: {e}");
    }
}

impl RenderTarget for Element {
    type Listener = ChangeListener;

    fn create_element(&self, tag: &str) -> Self {
        self.document().create_element(tag)
    }

    fn append_child(&self, child: &Self) {
        warn_on_err("append_child", Element::append_child(self, child));
    }

    fn remove(&self) {
        warn_on_err("remove", Element::remove(self));
    }

    fn hide(&self) {
        warn_on_err("hide", Element::hide(self));
    }

    fn show(&self) {
        warn_on_err("show", Element::show(self));
    }

    fn value(&self) -> String {
        Element::value(self)
    }

    fn set_value(&self, value: &str) {
        warn_on_err("set_value", Element::set_value(self, value));
    }

    fn set_attribute(&self, name: &str, value: &str) {
        warn_on_err("set_attribute", Element::set_attribute(self, name, value));
    }

    fn remove_attribute(&self, name: &str) {
        warn_on_err("remove_attribute", Element::remove_attribute(self, name));
    }

    fn set_text(&self, text: &str) {
        warn_on_err("set_text", Element::set_text(self, text));
    }

    fn add_class(&self, class: &str) {
        warn_on_err("add_class", Element::add_class(self, class));
    }

    fn siblings_with_class(&self, class: &str) -> Vec<Self> {
        Element::siblings_with_class(self, class)
    }

    fn insert_before(&self, node: &Self) {
        warn_on_err("insert_before", Element::insert_before(self, node));
    }

    fn on_change(&self) -> Option<Self::Listener> {
        Element::on_change(self)
            .inspect_err(|e| log::warn!("render target on_change failed: {e}"))
            .ok()
    }
}

impl ChangeSource for ChangeListener {
    fn try_next(&mut self) -> Option<String> {
        self.try_recv().map(|event| event.value)
    }

    async fn changed(&mut self) -> Option<String> {
        self.recv().await.map(|event| event.value)
    }
}
