//! Categories panel: colour table per item `className`.
//!
//! # Responsibility
//! - List every category with its style and usage count.
//! - Validate colours and class names before they reach the store.
//! - Publish the category stylesheet when it changes.

use super::binding::{PanelBinding, PanelView};
use super::stylesheet::{is_valid_class_name, is_valid_color, Stylesheet, StylesheetPublisher};
use super::{PanelError, PanelResult};
use crate::model::category::{CategoryPatch, CategoryStyle};
use crate::model::document::Document;
use crate::store::{DocumentStore, SubscriptionId};
use std::cell::Ref;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub class_name: String,
    pub style: CategoryStyle,
    /// Items currently using this category. Zero marks an orphan.
    pub item_count: usize,
}

#[derive(Debug, Default)]
pub struct CategoriesView {
    pub rows: Vec<CategoryRow>,
    stylesheet: StylesheetPublisher,
}

impl CategoriesView {
    pub fn stylesheet(&self) -> &Stylesheet {
        self.stylesheet.current()
    }
}

impl PanelView for CategoriesView {
    const NAME: &'static str = "categories";

    fn render(&mut self, document: &Document) {
        self.rows = document
            .categories
            .iter()
            .map(|(class_name, style)| CategoryRow {
                class_name: class_name.clone(),
                style: style.clone(),
                item_count: document.items_in_category(class_name),
            })
            .collect();
        self.stylesheet
            .publish(Stylesheet::for_categories(&document.categories));
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.stylesheet.publish(Stylesheet::default());
    }
}

pub struct CategoriesPanel {
    binding: PanelBinding<CategoriesView>,
}

impl CategoriesPanel {
    pub fn attach(store: &mut DocumentStore) -> Self {
        Self {
            binding: PanelBinding::attach(store, CategoriesView::default()),
        }
    }

    pub fn detach(self, store: &mut DocumentStore) {
        self.binding.detach(store);
    }

    pub fn view(&self) -> Ref<'_, CategoriesView> {
        self.binding.view()
    }

    /// Registers a stylesheet listener.
    ///
    /// The listener runs while the panel view is borrowed and must not call
    /// back into this panel.
    pub fn on_stylesheet_changed<F>(&self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Stylesheet) + 'static,
    {
        self.binding.view_mut().stylesheet.subscribe(listener)
    }

    pub fn remove_stylesheet_listener(&self, id: SubscriptionId) -> bool {
        self.binding.view_mut().stylesheet.unsubscribe(id)
    }

    pub fn add_category(
        &self,
        store: &mut DocumentStore,
        class_name: &str,
        style: CategoryStyle,
    ) -> PanelResult<()> {
        let class_name = class_name.trim();
        if !is_valid_class_name(class_name) {
            return Err(PanelError::InvalidClassName(class_name.to_string()));
        }
        for color in [&style.fg, &style.bg, &style.border] {
            ensure_color(color)?;
        }
        let result = store.add_category(class_name, style);
        self.binding.refresh(store);
        result.map_err(Into::into)
    }

    pub fn recolor(
        &self,
        store: &mut DocumentStore,
        class_name: &str,
        patch: &CategoryPatch,
    ) -> PanelResult<()> {
        for color in patch.colors() {
            ensure_color(color)?;
        }
        let result = store.update_category(class_name, patch);
        self.binding.refresh(store);
        result.map_err(Into::into)
    }

    /// Removes a category. Items referencing it keep their `className`.
    pub fn remove_category(&self, store: &mut DocumentStore, class_name: &str) -> PanelResult<()> {
        let result = store.remove_category(class_name);
        self.binding.refresh(store);
        result.map(|_| ()).map_err(Into::into)
    }
}

pub(crate) fn ensure_color(value: &str) -> PanelResult<()> {
    if is_valid_color(value) {
        Ok(())
    } else {
        Err(PanelError::InvalidColor(value.to_string()))
    }
}
