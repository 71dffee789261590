//! Era overlay model.
//!
//! # Responsibility
//! - Define named, coloured background spans independent of groups/items.
//!
//! # Invariants
//! - `end > start` is required for rendering only; invalid eras stay in the
//!   document untouched.

use serde::{Deserialize, Serialize};

/// Stable era key (uuid v4 string for generated eras).
pub type EraId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Era {
    pub text: String,
    pub start: i64,
    pub end: i64,
    pub color: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Era {
    /// Creates a visible era.
    pub fn new(text: impl Into<String>, start: i64, end: i64, color: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            color: color.into(),
            visible: true,
        }
    }

    /// Returns whether the span can be drawn.
    pub fn is_renderable(&self) -> bool {
        self.end > self.start
    }
}

/// Partial era update.
///
/// Blank strings are ignored. Visibility is only changed through
/// `toggle_era_visibility`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EraPatch {
    pub text: Option<String>,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub color: Option<String>,
}

impl EraPatch {
    pub fn apply_to(&self, era: &mut Era) {
        if let Some(text) = self.text.as_deref().filter(|value| !value.is_empty()) {
            era.text = text.to_string();
        }
        if let Some(start) = self.start {
            era.start = start;
        }
        if let Some(end) = self.end {
            era.end = end;
        }
        if let Some(color) = self.color.as_deref().filter(|value| !value.is_empty()) {
            era.color = color.to_string();
        }
    }
}
