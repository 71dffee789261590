//! Eras panel: table of background spans sorted by start.

use super::binding::{PanelBinding, PanelView};
use super::categories_panel::ensure_color;
use super::stylesheet::{Stylesheet, StylesheetPublisher};
use super::PanelResult;
use crate::model::document::Document;
use crate::model::era::{Era, EraId, EraPatch};
use crate::store::{DocumentStore, SubscriptionId};
use std::cell::Ref;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EraRow {
    pub uuid: EraId,
    pub text: String,
    pub start: i64,
    pub end: i64,
    pub color: String,
    pub visible: bool,
    /// `false` when `end <= start`; such eras are not drawn.
    pub renderable: bool,
}

#[derive(Debug, Default)]
pub struct ErasView {
    pub rows: Vec<EraRow>,
    stylesheet: StylesheetPublisher,
}

impl ErasView {
    pub fn stylesheet(&self) -> &Stylesheet {
        self.stylesheet.current()
    }
}

impl PanelView for ErasView {
    const NAME: &'static str = "eras";

    fn render(&mut self, document: &Document) {
        let mut rows: Vec<EraRow> = document
            .eras
            .iter()
            .map(|(uuid, era)| EraRow {
                uuid: uuid.clone(),
                text: era.text.clone(),
                start: era.start,
                end: era.end,
                color: era.color.clone(),
                visible: era.visible,
                renderable: era.is_renderable(),
            })
            .collect();
        rows.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.uuid.cmp(&b.uuid)));
        self.rows = rows;
        self.stylesheet.publish(Stylesheet::for_eras(&document.eras));
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.stylesheet.publish(Stylesheet::default());
    }
}

pub struct ErasPanel {
    binding: PanelBinding<ErasView>,
}

impl ErasPanel {
    pub fn attach(store: &mut DocumentStore) -> Self {
        Self {
            binding: PanelBinding::attach(store, ErasView::default()),
        }
    }

    pub fn detach(self, store: &mut DocumentStore) {
        self.binding.detach(store);
    }

    pub fn view(&self) -> Ref<'_, ErasView> {
        self.binding.view()
    }

    /// Registers a stylesheet listener. Same borrowing rule as categories.
    pub fn on_stylesheet_changed<F>(&self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Stylesheet) + 'static,
    {
        self.binding.view_mut().stylesheet.subscribe(listener)
    }

    pub fn remove_stylesheet_listener(&self, id: SubscriptionId) -> bool {
        self.binding.view_mut().stylesheet.unsubscribe(id)
    }

    /// Adds a visible era under a fresh uuid.
    pub fn add_era(
        &self,
        store: &mut DocumentStore,
        text: &str,
        start: i64,
        end: i64,
        color: &str,
    ) -> PanelResult<EraId> {
        ensure_color(color)?;
        let uuid = Uuid::new_v4().to_string();
        let result = store.add_era(uuid.clone(), Era::new(text, start, end, color.trim()));
        self.binding.refresh(store);
        result.map(|()| uuid).map_err(Into::into)
    }

    pub fn update_era(&self, store: &mut DocumentStore, uuid: &str, patch: &EraPatch) -> PanelResult<()> {
        if let Some(color) = patch.color.as_deref().filter(|value| !value.is_empty()) {
            ensure_color(color)?;
        }
        let result = store.update_era(uuid, patch);
        self.binding.refresh(store);
        result.map_err(Into::into)
    }

    pub fn remove_era(&self, store: &mut DocumentStore, uuid: &str) -> PanelResult<()> {
        let result = store.remove_era(uuid);
        self.binding.refresh(store);
        result.map(|_| ()).map_err(Into::into)
    }

    pub fn toggle_visibility(&self, store: &mut DocumentStore, uuid: &str) -> PanelResult<bool> {
        let result = store.toggle_era_visibility(uuid);
        self.binding.refresh(store);
        result.map_err(Into::into)
    }
}
