//! Item category styles.
//!
//! # Invariants
//! - Entries are created lazily on first use of a `className`.
//! - Entries are never pruned automatically; orphans are tolerated.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY_FG: &str = "#1a1a1a";
pub const DEFAULT_CATEGORY_BG: &str = "#d5ddf6";
pub const DEFAULT_CATEGORY_BORDER: &str = "#97b0f8";

/// Foreground/background/border colour triple for one `className`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStyle {
    pub fg: String,
    pub bg: String,
    pub border: String,
}

impl Default for CategoryStyle {
    fn default() -> Self {
        Self {
            fg: DEFAULT_CATEGORY_FG.to_string(),
            bg: DEFAULT_CATEGORY_BG.to_string(),
            border: DEFAULT_CATEGORY_BORDER.to_string(),
        }
    }
}

/// Partial colour update. Blank values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub border: Option<String>,
}

impl CategoryPatch {
    /// Returns the populated, non-blank colour values.
    pub fn colors(&self) -> impl Iterator<Item = &str> {
        [&self.fg, &self.bg, &self.border]
            .into_iter()
            .filter_map(|value| non_blank(value.as_deref()))
    }

    pub fn apply_to(&self, style: &mut CategoryStyle) {
        if let Some(fg) = non_blank(self.fg.as_deref()) {
            style.fg = fg.to_string();
        }
        if let Some(bg) = non_blank(self.bg.as_deref()) {
            style.bg = bg.to_string();
        }
        if let Some(border) = non_blank(self.border.as_deref()) {
            style.border = border.to_string();
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{CategoryPatch, CategoryStyle, DEFAULT_CATEGORY_BORDER};

    #[test]
    fn blank_patch_fields_are_ignored() {
        let mut style = CategoryStyle::default();
        CategoryPatch {
            fg: Some("#ff0000".to_string()),
            bg: Some("   ".to_string()),
            border: None,
        }
        .apply_to(&mut style);

        assert_eq!(style.fg, "#ff0000");
        assert_eq!(style.bg, CategoryStyle::default().bg);
        assert_eq!(style.border, DEFAULT_CATEGORY_BORDER);
    }
}
