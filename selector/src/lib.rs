//! Dropdown selector bound to a fetchable collection of records.
//!
//! The [`Selector`] keeps a `<select>` control in sync with a [`Collection`]:
//! it rebuilds options (optionally grouped) whenever the collection syncs,
//! shows a single option as static text, and broadcasts selection changes.

pub mod collection;
pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod option;
pub mod resolve;
pub mod target;
pub mod widget;

pub use collection::{Collection, CollectionEvent, FetchRequest, Group, MemoryCollection};
pub use config::{ModelAttributes, SelectorOptions};
pub use error::SelectorError;
pub use event::{Emitter, SelectorEvent, Subscription, SubscriptionId};
pub use model::{Record, Value};
pub use option::{OptionEntry, OptionGroup, OptionGroupNode, OptionNode};
pub use resolve::AttributeSpec;
pub use target::{ChangeSource, RenderTarget};
pub use widget::{Mode, Selector, SelectorBuilder, SelectorId, SelectorState};

pub mod prelude {
    pub use crate::collection::{Collection, MemoryCollection};
    pub use crate::config::{ModelAttributes, SelectorOptions};
    pub use crate::event::SelectorEvent;
    pub use crate::model::{Record, Value};
    pub use crate::resolve::AttributeSpec;
    pub use crate::target::RenderTarget;
    pub use crate::widget::{Mode, Selector};
}
