//! Root document aggregate.
//!
//! # Responsibility
//! - Hold configuration plus the five document collections.
//! - Define the persisted JSON key names.
//!
//! # Invariants
//! - Every section is always present; missing sections deserialize to empty
//!   defaults.
//! - `categories` is serialized as `item_categories`.

use crate::model::category::CategoryStyle;
use crate::model::era::Era;
use crate::model::group::Group;
use crate::model::item::Item;
use crate::model::marker::Marker;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Locale used when the document does not declare one.
pub const DEFAULT_LOCALE: &str = "en";

/// Display configuration stored with the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Start of the display window. `None` until first inferred from content.
    #[serde(
        rename = "startDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<i64>,
    /// End of the display window. `None` until first inferred from content.
    #[serde(rename = "endDate", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<i64>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            start_date: None,
            end_date: None,
        }
    }
}

impl Configuration {
    /// Returns the display window when both bounds are set.
    pub fn display_window(&self) -> Option<(i64, i64)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

/// Whole timeline document as loaded from and saved to one JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub configuration: Configuration,
    /// Ordered group forest.
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub items: Vec<Item>,
    /// Style triple per item `className`.
    #[serde(rename = "item_categories", default)]
    pub categories: BTreeMap<String, CategoryStyle>,
    #[serde(default)]
    pub eras: BTreeMap<String, Era>,
    #[serde(default)]
    pub markers: BTreeMap<String, Marker>,
}

impl Document {
    /// Top-level JSON keys every well-formed document carries.
    pub const SECTIONS: [&'static str; 6] = [
        "configuration",
        "groups",
        "items",
        "item_categories",
        "eras",
        "markers",
    ];

    /// Returns one item by id.
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Counts items that reference one category.
    pub fn items_in_category(&self, class_name: &str) -> usize {
        self.items
            .iter()
            .filter(|item| item.class_name.as_deref() == Some(class_name))
            .count()
    }
}
