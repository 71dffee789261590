//! Timeline item model.
//!
//! # Responsibility
//! - Define one schedulable timeline entry.
//! - Define `ItemPatch` partial-update semantics.
//!
//! # Invariants
//! - `id` is non-blank and unique within the document.
//! - `ItemType::Range` items carry an `end` not before `start`; the store
//!   rejects writes that break this.
//! - `description` is opaque rich content and never interpreted by core.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable item identifier.
pub type ItemId = String;

/// Visual kind of one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Point,
    #[default]
    Box,
    Range,
    Background,
}

/// One timeline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: ItemId,
    /// Owning group id. `None` renders the item outside any lane.
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub content: String,
    /// Category key. Serialized as `className` to match widget naming.
    #[serde(
        rename = "className",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub class_name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ItemType,
    pub start: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub description: Value,
}

impl Item {
    /// Creates an item without group, category, end, or description.
    pub fn new(
        id: impl Into<ItemId>,
        content: impl Into<String>,
        kind: ItemType,
        start: i64,
    ) -> Self {
        Self {
            id: id.into(),
            group: None,
            content: content.into(),
            class_name: None,
            kind,
            start,
            end: None,
            description: Value::Null,
        }
    }

    /// Returns whether the id is usable as a document key.
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

/// Partial update for one item.
///
/// `None` leaves the field untouched. Nullable item fields use a nested
/// option so a patch can clear them explicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub id: ItemId,
    pub group: Option<Option<String>>,
    pub content: Option<String>,
    pub class_name: Option<Option<String>>,
    pub kind: Option<ItemType>,
    pub start: Option<i64>,
    pub end: Option<Option<i64>>,
    pub description: Option<Value>,
}

impl ItemPatch {
    /// Creates an empty patch targeting one item id.
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Creates a patch that overwrites every field with `item`'s values.
    pub fn replace_with(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            group: Some(item.group.clone()),
            content: Some(item.content.clone()),
            class_name: Some(item.class_name.clone()),
            kind: Some(item.kind),
            start: Some(item.start),
            end: Some(item.end),
            description: Some(item.description.clone()),
        }
    }

    /// Creates a schedule-only patch, as produced by dragging an item.
    pub fn schedule(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            group: Some(item.group.clone()),
            start: Some(item.start),
            end: Some(item.end),
            ..Self::default()
        }
    }

    pub fn with_start(mut self, start: i64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: Option<i64>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(Some(class_name.into()));
        self
    }

    /// Clears the item's category reference.
    pub fn without_class_name(mut self) -> Self {
        self.class_name = Some(None);
        self
    }

    pub fn with_group(mut self, group: Option<String>) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_kind(mut self, kind: ItemType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Applies every populated field to `item`.
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(group) = &self.group {
            item.group = group.clone();
        }
        if let Some(content) = &self.content {
            item.content = content.clone();
        }
        if let Some(class_name) = &self.class_name {
            item.class_name = class_name.clone();
        }
        if let Some(kind) = self.kind {
            item.kind = kind;
        }
        if let Some(start) = self.start {
            item.start = start;
        }
        if let Some(end) = self.end {
            item.end = end;
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Item, ItemPatch, ItemType};
    use serde_json::json;

    #[test]
    fn start_only_patch_leaves_other_fields() {
        let mut item = Item::new("i1", "Kickoff", ItemType::Point, 100);
        item.class_name = Some("milestone".to_string());

        ItemPatch::new("i1").with_start(250).apply_to(&mut item);

        assert_eq!(item.start, 250);
        assert_eq!(item.content, "Kickoff");
        assert_eq!(item.class_name.as_deref(), Some("milestone"));
        assert_eq!(item.kind, ItemType::Point);
    }

    #[test]
    fn nested_option_patch_clears_end_and_group() {
        let mut item = Item::new("i1", "Phase", ItemType::Range, 0);
        item.end = Some(10);
        item.group = Some("g1".to_string());

        ItemPatch::new("i1")
            .with_end(None)
            .with_group(None)
            .apply_to(&mut item);

        assert_eq!(item.end, None);
        assert_eq!(item.group, None);
    }

    #[test]
    fn class_name_can_be_cleared_or_kept() {
        let mut item = Item::new("i1", "Ship", ItemType::Box, 0);
        item.class_name = Some("release".to_string());

        ItemPatch::new("i1").with_start(5).apply_to(&mut item);
        assert_eq!(item.class_name.as_deref(), Some("release"));

        ItemPatch::new("i1").without_class_name().apply_to(&mut item);
        assert_eq!(item.class_name, None);
    }

    #[test]
    fn replace_with_carries_a_removed_category() {
        let mut stored = Item::new("i1", "Ship", ItemType::Box, 0);
        stored.class_name = Some("release".to_string());
        let edited = Item::new("i1", "Ship", ItemType::Box, 0);

        ItemPatch::replace_with(&edited).apply_to(&mut stored);

        assert_eq!(stored.class_name, None);
    }

    #[test]
    fn serde_uses_widget_key_names() {
        let mut item = Item::new("i1", "Release", ItemType::Range, 1);
        item.end = Some(2);
        item.class_name = Some("ship".to_string());
        item.description = json!({"ops": [{"insert": "notes"}]});

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "range");
        assert_eq!(value["className"], "ship");
        assert_eq!(value["description"]["ops"][0]["insert"], "notes");

        let back: Item = serde_json::from_value(value).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn blank_id_is_not_usable() {
        assert!(!Item::new("  ", "x", ItemType::Box, 0).has_id());
        assert!(Item::new("i", "x", ItemType::Box, 0).has_id());
    }
}
