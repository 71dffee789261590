//! Contracts for the external widget and user-facing dialogs.
//!
//! Core never implements these; the embedding UI does.

use crate::model::item::{Item, ItemType};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Flat group row as drawn by the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetGroup {
    pub id: String,
    /// Display label.
    pub content: String,
    /// Lane style key. `None` when the group has no category.
    pub class_name: Option<String>,
    /// 1-based tree depth.
    pub level: u32,
    pub parent: Option<String>,
    /// Ids of visible direct children.
    pub nested_groups: Vec<String>,
    /// Sibling order key, copied from `Group::position`.
    pub order: i64,
}

/// Item or era span as drawn by the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetItem {
    pub id: String,
    pub group: Option<String>,
    pub content: String,
    pub class_name: Option<String>,
    pub kind: ItemType,
    pub start: i64,
    pub end: Option<i64>,
}

/// Draggable, titled time pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetMarker {
    pub id: String,
    pub title: String,
    pub date: i64,
    pub editable: bool,
}

/// Structural failures reported by the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// A marker with this id is already drawn.
    DuplicateMarker(String),
    /// The visual element for this id does not exist.
    ElementMissing(String),
}

impl Display for WidgetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateMarker(id) => write!(f, "duplicate marker identifier: {id}"),
            Self::ElementMissing(id) => write!(f, "timeline element missing: {id}"),
        }
    }
}

impl Error for WidgetError {}

/// Rendering surface driven by the adapter.
pub trait TimelineWidget {
    fn set_groups(&mut self, groups: Vec<WidgetGroup>);
    fn set_items(&mut self, items: Vec<WidgetItem>);
    /// Observed min/max time of the drawn content, if any.
    fn content_bounds(&self) -> Option<(i64, i64)>;
    fn set_window(&mut self, start: i64, end: i64);
    fn set_locale(&mut self, locale: &str);
    /// Enables or disables drag/edit affordances.
    fn set_editable(&mut self, editable: bool);
    /// Ids of the markers currently drawn, in draw order.
    fn marker_ids(&self) -> Vec<String>;
    fn add_marker(&mut self, marker: &WidgetMarker) -> Result<(), WidgetError>;
    fn update_marker(&mut self, marker: &WidgetMarker) -> Result<(), WidgetError>;
    fn remove_marker(&mut self, id: &str) -> Result<(), WidgetError>;
}

/// Modal dialogs and blocking notices.
///
/// Calls resolve before any store mutation happens, so a cancelled dialog
/// never leaves partial state behind.
pub trait EditorPrompts {
    /// Opens the item editor. `None` means the user cancelled.
    fn edit_item(&mut self, draft: &Item) -> Option<Item>;
    /// Asks for removal confirmation.
    fn confirm_remove(&mut self, item: &Item) -> bool;
    /// Shows a blocking notice.
    fn alert(&mut self, message: &str);
}
