//! Minimal in-memory element tree.
//!
//! Provides a mountable, mutable node tree with just enough behaviour to host
//! form controls headlessly: attributes, classes, text, visibility, sibling
//! queries and `<select>` value semantics with change listeners.

pub mod document;
pub mod element;
pub mod error;
pub mod event;

pub use document::{Document, NodeId};
pub use element::Element;
pub use error::DomError;
pub use event::{ChangeEvent, ChangeListener};
