//! Marker model: named, movable point-in-time annotations.

use serde::{Deserialize, Serialize};

/// Stable marker key (uuid v4 string for generated markers).
pub type MarkerId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    pub date: i64,
}

impl Marker {
    pub fn new(name: impl Into<String>, date: i64) -> Self {
        Self {
            name: name.into(),
            date,
        }
    }
}

/// Partial marker update. A blank `name` is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerPatch {
    pub name: Option<String>,
    pub date: Option<i64>,
}

impl MarkerPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            date: None,
        }
    }

    pub fn move_to(date: i64) -> Self {
        Self {
            name: None,
            date: Some(date),
        }
    }

    pub fn apply_to(&self, marker: &mut Marker) {
        if let Some(name) = self.name.as_deref().filter(|value| !value.is_empty()) {
            marker.name = name.to_string();
        }
        if let Some(date) = self.date {
            marker.date = date;
        }
    }
}
