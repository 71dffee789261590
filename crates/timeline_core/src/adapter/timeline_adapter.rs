//! Widget adapter: keeps one timeline widget in sync with the store.
//!
//! # Responsibility
//! - Redraw the widget after every document change.
//! - Infer the display window once from rendered content when unset.
//! - Route widget edit callbacks through dialogs and into the store.
//!
//! # Invariants
//! - Dialogs resolve before the store is touched.
//! - The widget keeps an added/edited item only when the store accepted it.
//! - Lock mode turns every edit callback into a no-op.
//! - The view borrow is never held across a store call, since store calls
//!   re-enter the view through the change listener.
//! - An inferred display window is queued as a deferred store edit, so it is
//!   persisted whichever path triggered the first render.

use super::projection::{flatten_groups, materialize_items, project_markers};
use super::widget::{EditorPrompts, TimelineWidget, WidgetError};
use crate::model::document::Document;
use crate::model::item::{Item, ItemPatch};
use crate::model::marker::{MarkerId, MarkerPatch};
use crate::store::{DeferredEdit, DeferredEdits, DocumentStore, SubscriptionId};
use log::{debug, error, info, warn};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashSet;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Name given to markers created from the timeline axis.
pub const DEFAULT_MARKER_NAME: &str = "New marker";
/// Padding used when the inferred window would be empty.
const WINDOW_PADDING_MS: i64 = 24 * 60 * 60 * 1000;

/// Widget-side state shared with the store listener.
struct TimelineView<W, P> {
    widget: W,
    prompts: P,
    locked: bool,
    /// Set when the last marker sync failed and the user was already told.
    marker_sync_failed: bool,
    deferred: DeferredEdits,
    clock: fn() -> i64,
}

impl<W: TimelineWidget, P: EditorPrompts> TimelineView<W, P> {
    fn redraw(&mut self, document: &Document) {
        self.widget.set_locale(&document.configuration.locale);
        self.widget.set_editable(!self.locked);
        self.widget.set_groups(flatten_groups(&document.groups));
        self.widget.set_items(materialize_items(document));

        match document.configuration.display_window() {
            Some((start, end)) => self.widget.set_window(start, end),
            None => {
                let (start, end) = self.infer_window();
                self.widget.set_window(start, end);
                self.deferred.push(DeferredEdit::InferredWindow { start, end });
            }
        }

        self.marker_sync_failed = false;
        if let Err(err) = self.sync_markers(document) {
            warn!("event=marker_sync module=adapter status=error error={err}");
            self.prompts.alert(&err.to_string());
            self.marker_sync_failed = true;
        }
    }

    fn infer_window(&self) -> (i64, i64) {
        let (start, end) = self.widget.content_bounds().unwrap_or_else(|| {
            let now = (self.clock)();
            (now, now)
        });
        if end > start {
            (start, end)
        } else {
            (start - WINDOW_PADDING_MS, end + WINDOW_PADDING_MS)
        }
    }

    fn sync_markers(&mut self, document: &Document) -> Result<(), WidgetError> {
        let drawn = self.widget.marker_ids();
        let mut seen = HashSet::new();
        if let Some(duplicate) = drawn.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(WidgetError::DuplicateMarker(duplicate.clone()));
        }

        for id in drawn.iter().filter(|id| !document.markers.contains_key(*id)) {
            self.widget.remove_marker(id)?;
        }
        for marker in project_markers(document, !self.locked) {
            if seen.contains(marker.id.as_str()) {
                self.widget.update_marker(&marker)?;
            } else {
                self.widget.add_marker(&marker)?;
            }
        }
        Ok(())
    }
}

/// Adapter between one `DocumentStore` and one timeline widget.
pub struct TimelineAdapter<W, P> {
    view: Rc<RefCell<TimelineView<W, P>>>,
    subscription: Option<SubscriptionId>,
}

impl<W, P> TimelineAdapter<W, P>
where
    W: TimelineWidget + 'static,
    P: EditorPrompts + 'static,
{
    /// Subscribes to the store and performs the first render.
    pub fn attach(store: &mut DocumentStore, widget: W, prompts: P) -> Self {
        Self::attach_with_clock(store, widget, prompts, now_epoch_ms)
    }

    /// Same as `attach`, with an explicit clock used for window inference.
    pub fn attach_with_clock(
        store: &mut DocumentStore,
        widget: W,
        prompts: P,
        clock: fn() -> i64,
    ) -> Self {
        let view = Rc::new(RefCell::new(TimelineView {
            widget,
            prompts,
            locked: false,
            marker_sync_failed: false,
            deferred: store.deferred_edits(),
            clock,
        }));

        let listener_view = Rc::clone(&view);
        let subscription = store.subscribe(move |change, document| {
            debug!(
                "event=widget_redraw module=adapter status=start change={}",
                change.as_str()
            );
            listener_view.borrow_mut().redraw(document);
        });

        let mut adapter = Self {
            view,
            subscription: Some(subscription),
        };
        adapter.render(store);
        adapter
    }

    /// Unsubscribes from the store. The widget is no longer redrawn.
    pub fn detach(mut self, store: &mut DocumentStore) {
        if let Some(subscription) = self.subscription.take() {
            store.unsubscribe(subscription);
        }
    }

    /// Full refresh, then lets the store apply an inferred display window.
    pub fn render(&mut self, store: &mut DocumentStore) {
        {
            let mut view = self.view.borrow_mut();
            let Some(document) = store.document() else {
                debug!("event=widget_redraw module=adapter status=skip reason=not_loaded");
                return;
            };
            view.redraw(document);
        }
        store.apply_deferred();
    }

    pub fn widget(&self) -> Ref<'_, W> {
        Ref::map(self.view.borrow(), |view| &view.widget)
    }

    pub fn widget_mut(&self) -> RefMut<'_, W> {
        RefMut::map(self.view.borrow_mut(), |view| &mut view.widget)
    }

    pub fn prompts(&self) -> Ref<'_, P> {
        Ref::map(self.view.borrow(), |view| &view.prompts)
    }

    pub fn prompts_mut(&self) -> RefMut<'_, P> {
        RefMut::map(self.view.borrow_mut(), |view| &mut view.prompts)
    }

    pub fn is_locked(&self) -> bool {
        self.view.borrow().locked
    }

    /// Enables or disables read-only mode and redraws.
    pub fn set_locked(&mut self, store: &mut DocumentStore, locked: bool) {
        self.view.borrow_mut().locked = locked;
        info!("event=lock_mode module=adapter status=ok locked={locked}");
        self.render(store);
    }

    /// Widget asks to add `draft`. Returns the item the widget should keep.
    pub fn on_item_add(&mut self, store: &mut DocumentStore, draft: Item) -> Option<Item> {
        if self.ignore_when_locked("item_add") {
            return None;
        }
        let edited = self.view.borrow_mut().prompts.edit_item(&draft)?;
        match store.add_item(edited.clone()) {
            Ok(()) => Some(edited),
            Err(err) => {
                warn!("event=item_add module=adapter status=rejected error={err}");
                None
            }
        }
    }

    /// Widget asks to edit `item` through the dialog.
    pub fn on_item_update(&mut self, store: &mut DocumentStore, item: Item) -> Option<Item> {
        if self.ignore_when_locked("item_update") {
            return None;
        }
        let edited = self.view.borrow_mut().prompts.edit_item(&item)?;
        match store.update_item(&ItemPatch::replace_with(&edited)) {
            Ok(()) => Some(edited),
            Err(err) => {
                warn!("event=item_update module=adapter status=rejected error={err}");
                None
            }
        }
    }

    /// Widget asks to remove `item`. Returns whether it was removed.
    pub fn on_item_remove(&mut self, store: &mut DocumentStore, item: &Item) -> bool {
        if self.ignore_when_locked("item_remove") {
            return false;
        }
        if !self.view.borrow_mut().prompts.confirm_remove(item) {
            return false;
        }
        match store.remove_item(&item.id) {
            Ok(_) => true,
            Err(err) => {
                warn!("event=item_remove module=adapter status=rejected error={err}");
                false
            }
        }
    }

    /// Item dragged to a new schedule. No confirmation step.
    pub fn on_item_move(&mut self, store: &mut DocumentStore, item: Item) -> Option<Item> {
        if self.ignore_when_locked("item_move") {
            return None;
        }
        match store.update_item(&ItemPatch::schedule(&item)) {
            Ok(()) => Some(item),
            Err(err) => {
                warn!("event=item_move module=adapter status=rejected error={err}");
                None
            }
        }
    }

    /// Double-click on empty axis creates a marker at `date`.
    pub fn on_axis_double_click(
        &mut self,
        store: &mut DocumentStore,
        date: i64,
    ) -> Option<MarkerId> {
        if self.ignore_when_locked("marker_add") {
            return None;
        }
        let id = Uuid::new_v4().to_string();
        if let Err(err) = store.add_marker(id.clone(), DEFAULT_MARKER_NAME, date) {
            warn!("event=marker_add module=adapter status=rejected error={err}");
            return None;
        }

        let (drawn, already_reported) = {
            let view = self.view.borrow();
            (view.widget.marker_ids().contains(&id), view.marker_sync_failed)
        };
        if !drawn {
            let err = WidgetError::ElementMissing(id.clone());
            warn!("event=marker_add module=adapter status=error error={err}");
            if !already_reported {
                self.view.borrow_mut().prompts.alert(&err.to_string());
            }
            // Aborted: drop the marker the widget could not show.
            if let Err(err) = store.remove_marker(&id) {
                error!("event=marker_rollback module=adapter status=error id={id} error={err}");
            }
            return None;
        }
        Some(id)
    }

    /// Double-click on a marker removes it.
    pub fn on_marker_double_click(&mut self, store: &mut DocumentStore, id: &str) -> bool {
        if self.ignore_when_locked("marker_remove") {
            return false;
        }
        match store.remove_marker(id) {
            Ok(_) => true,
            Err(err) => {
                warn!("event=marker_remove module=adapter status=rejected error={err}");
                false
            }
        }
    }

    /// Marker title edited in place.
    pub fn on_marker_renamed(&mut self, store: &mut DocumentStore, id: &str, name: &str) -> bool {
        if self.ignore_when_locked("marker_rename") {
            return false;
        }
        self.update_marker(store, id, MarkerPatch::rename(name))
    }

    /// Marker dragged to `date`.
    pub fn on_marker_moved(&mut self, store: &mut DocumentStore, id: &str, date: i64) -> bool {
        if self.ignore_when_locked("marker_move") {
            return false;
        }
        self.update_marker(store, id, MarkerPatch::move_to(date))
    }

    fn update_marker(&mut self, store: &mut DocumentStore, id: &str, patch: MarkerPatch) -> bool {
        match store.update_marker(id, &patch) {
            Ok(()) => true,
            Err(err) => {
                warn!("event=marker_update module=adapter status=rejected error={err}");
                false
            }
        }
    }

    fn ignore_when_locked(&self, action: &str) -> bool {
        let locked = self.is_locked();
        if locked {
            debug!("event={action} module=adapter status=skip reason=locked");
        }
        locked
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}
