//! Panel controllers: live editable views over one document slice each.
//!
//! # Responsibility
//! - Render a list/table view model of one document slice.
//! - Apply user edits through `DocumentStore` methods only.
//! - Publish derived stylesheets for categories and eras.
//!
//! # Invariants
//! - Views re-render on every store notification and after local edits.
//! - Stylesheet listeners fire only when the generated CSS text changes.

pub mod binding;
pub mod categories_panel;
pub mod config_panel;
pub mod eras_panel;
pub mod groups_panel;
pub mod stylesheet;

use crate::store::DocumentError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use binding::{PanelBinding, PanelView};
pub use categories_panel::{CategoriesPanel, CategoriesView, CategoryRow};
pub use config_panel::{ConfigurationPanel, ConfigurationView};
pub use eras_panel::{EraRow, ErasPanel, ErasView};
pub use groups_panel::{GroupOrder, GroupRow, GroupsPanel, GroupsView};
pub use stylesheet::{StyleRule, Stylesheet, StylesheetPublisher};

pub type PanelResult<T> = Result<T, PanelError>;

/// Errors from panel edits.
#[derive(Debug)]
pub enum PanelError {
    /// Colour value is not an accepted CSS colour.
    InvalidColor(String),
    /// Class name cannot be used as a CSS class selector.
    InvalidClassName(String),
    /// Store rejected the edit.
    Document(DocumentError),
}

impl Display for PanelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidColor(value) => write!(f, "invalid colour: `{value}`"),
            Self::InvalidClassName(value) => write!(f, "invalid class name: `{value}`"),
            Self::Document(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PanelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Document(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DocumentError> for PanelError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}
