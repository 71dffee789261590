//! Configuration panel: locale and display window.

use super::binding::{PanelBinding, PanelView};
use super::PanelResult;
use crate::model::document::{Document, DEFAULT_LOCALE};
use crate::store::DocumentStore;
use std::cell::Ref;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationView {
    pub locale: String,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl Default for ConfigurationView {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            start: None,
            end: None,
        }
    }
}

impl PanelView for ConfigurationView {
    const NAME: &'static str = "configuration";

    fn render(&mut self, document: &Document) {
        let configuration = &document.configuration;
        self.locale = configuration.locale.clone();
        self.start = configuration.start_date;
        self.end = configuration.end_date;
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

pub struct ConfigurationPanel {
    binding: PanelBinding<ConfigurationView>,
}

impl ConfigurationPanel {
    pub fn attach(store: &mut DocumentStore) -> Self {
        Self {
            binding: PanelBinding::attach(store, ConfigurationView::default()),
        }
    }

    pub fn detach(self, store: &mut DocumentStore) {
        self.binding.detach(store);
    }

    pub fn view(&self) -> Ref<'_, ConfigurationView> {
        self.binding.view()
    }

    pub fn set_locale(&self, store: &mut DocumentStore, locale: &str) -> PanelResult<()> {
        let result = store.set_locale(locale);
        self.binding.refresh(store);
        result.map_err(Into::into)
    }

    pub fn set_window(&self, store: &mut DocumentStore, start: i64, end: i64) -> PanelResult<()> {
        let result = store.set_display_window(start, end);
        self.binding.refresh(store);
        result.map_err(Into::into)
    }

    /// Clears the window so the timeline infers it again on next render.
    pub fn reset_window(&self, store: &mut DocumentStore) -> PanelResult<()> {
        let result = store.clear_display_window();
        self.binding.refresh(store);
        result.map_err(Into::into)
    }
}
