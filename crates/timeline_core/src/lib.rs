//! Core of the timeline document editor.
//! This crate owns the document model and every rule that keeps it
//! consistent with the timeline widget and the editing panels.

pub mod adapter;
pub mod logging;
pub mod model;
pub mod options;
pub mod panel;
pub mod store;

pub use adapter::{
    EditorPrompts, TimelineAdapter, TimelineWidget, WidgetError, WidgetGroup, WidgetItem,
    WidgetMarker,
};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::category::{CategoryPatch, CategoryStyle};
pub use model::document::{Configuration, Document};
pub use model::era::{Era, EraId, EraPatch};
pub use model::group::{Group, GroupId};
pub use model::item::{Item, ItemId, ItemPatch, ItemType};
pub use model::marker::{Marker, MarkerId, MarkerPatch};
pub use options::EditorOptions;
pub use panel::{
    CategoriesPanel, ConfigurationPanel, ErasPanel, GroupOrder, GroupsPanel, PanelError,
    Stylesheet,
};
pub use store::{
    DeferredEdit, DeferredEdits, DocumentChange, DocumentError, DocumentResult, DocumentStore,
    LoadReport, SubscriptionId,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
