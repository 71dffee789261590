//! Bridge between the document store and the external timeline widget.
//!
//! # Responsibility
//! - Flatten the group forest and materialize items/eras/markers into the
//!   shapes the widget draws.
//! - Translate widget edit callbacks into document store mutations.
//!
//! # Invariants
//! - The widget is redrawn from store state only; it is never the source of
//!   truth.
//! - In lock mode no widget callback reaches the store.

pub mod projection;
pub mod timeline_adapter;
pub mod widget;

pub use projection::{flatten_groups, materialize_items, project_markers};
pub use timeline_adapter::TimelineAdapter;
pub use widget::{
    EditorPrompts, TimelineWidget, WidgetError, WidgetGroup, WidgetItem, WidgetMarker,
};
