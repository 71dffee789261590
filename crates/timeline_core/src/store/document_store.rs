//! Document store implementation.
//!
//! # Responsibility
//! - Provide CRUD entry points for groups, items, categories, eras, markers
//!   and configuration.
//! - Keep category references closed: using an unseen `className` creates a
//!   default-style category in the same mutation.
//!
//! # Invariants
//! - Exactly one notification per successful mutation; `load` always
//!   notifies once, even when it fell back to an empty document.
//! - Group sibling order stays sorted by `position`.
//! - Edits queued through `deferred_edits` run after the fan-out that
//!   queued them, each as its own mutation with its own notification.
//! - No `&mut Document` ever leaves this module.

use super::deferred::{DeferredEdit, DeferredEdits};
use super::group_tree::{locate, node_at_mut, remove_at};
use super::listeners::{Listeners, SubscriptionId};
use super::persistence::{parse_document, serialize_document};
use super::{DocumentChange, DocumentError, DocumentResult};
use crate::model::category::{CategoryPatch, CategoryStyle};
use crate::model::document::Document;
use crate::model::era::{Era, EraPatch};
use crate::model::group::{find_duplicate_id, sort_forest, Group, GroupId};
use crate::model::item::{Item, ItemPatch, ItemType};
use crate::model::marker::{Marker, MarkerPatch};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

/// Callback invoked after every successful mutation.
pub type DocumentListener = dyn FnMut(DocumentChange, &Document);

/// Summary of one `load` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Sections that were missing in the input and backfilled.
    pub backfilled: Vec<&'static str>,
    /// Set when the input was replaced by an empty document.
    pub fallback: Option<String>,
}

impl LoadReport {
    /// Returns whether the stored content was used as-is.
    pub fn is_clean(&self) -> bool {
        self.fallback.is_none() && self.backfilled.is_empty()
    }
}

/// Owner of the in-memory timeline document.
#[derive(Debug, Default)]
pub struct DocumentStore {
    document: Option<Document>,
    source_path: Option<PathBuf>,
    listeners: Listeners<DocumentListener>,
    deferred: DeferredEdits,
}

impl DocumentStore {
    /// Creates a store with no document loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store bound to one document file. Call `load` to read it.
    pub fn with_source(path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Returns the loaded document, if any.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Returns the file the document was loaded from.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Returns whether a document with all six sections is loaded.
    ///
    /// Render and derived-view code must check this first.
    pub fn is_valid(&self) -> bool {
        self.document.is_some()
    }

    /// Registers a change listener.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(DocumentChange, &Document) + 'static,
    {
        self.listeners.insert(Box::new(listener))
    }

    /// Removes a change listener. Returns `false` for unknown handles.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Returns a handle listeners use to queue follow-up edits.
    ///
    /// Queued edits run after every notification, or on `apply_deferred`.
    pub fn deferred_edits(&self) -> DeferredEdits {
        self.deferred.clone()
    }

    /// Applies queued edits in order.
    pub fn apply_deferred(&mut self) {
        while let Some(edit) = self.deferred.pop() {
            match edit {
                DeferredEdit::InferredWindow { start, end } => {
                    self.backfill_display_window(start, end)
                }
            }
        }
    }

    /// Reloads the document from the bound source file.
    ///
    /// A missing source path or unreadable file yields an empty document.
    pub fn load(&mut self) -> LoadReport {
        let text = match self.source_path.as_deref() {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) => {
                    warn!(
                        "event=document_load module=store status=fallback reason=read_failed path={} error={}",
                        path.display(),
                        err
                    );
                    String::new()
                }
            },
            None => String::new(),
        };
        self.load_str(&text)
    }

    /// Binds the store to `path` and loads it.
    pub fn load_from(&mut self, path: impl Into<PathBuf>) -> LoadReport {
        self.source_path = Some(path.into());
        self.load()
    }

    /// Replaces the document with parsed `text`.
    pub fn load_str(&mut self, text: &str) -> LoadReport {
        let started_at = Instant::now();
        let parsed = parse_document(text);

        match parsed.fallback.as_deref() {
            Some(reason) => warn!(
                "event=document_load module=store status=fallback duration_ms={} reason={}",
                started_at.elapsed().as_millis(),
                reason
            ),
            None => info!(
                "event=document_load module=store status=ok duration_ms={} groups={} items={} backfilled={}",
                started_at.elapsed().as_millis(),
                parsed.document.groups.len(),
                parsed.document.items.len(),
                parsed.backfilled.len()
            ),
        }

        self.document = Some(parsed.document);
        self.emit(DocumentChange::Loaded);
        LoadReport {
            backfilled: parsed.backfilled,
            fallback: parsed.fallback,
        }
    }

    /// Writes the whole document to `destination`, overwriting it.
    ///
    /// No validation runs before saving. With nothing loaded an empty
    /// document is written.
    pub fn save(&self, destination: impl AsRef<Path>) -> DocumentResult<()> {
        let destination = destination.as_ref();
        let started_at = Instant::now();
        let text = match &self.document {
            Some(document) => serialize_document(document)?,
            None => serialize_document(&Document::default())?,
        };

        if let Err(source) = std::fs::write(destination, text) {
            error!(
                "event=document_save module=store status=error path={} error={}",
                destination.display(),
                source
            );
            return Err(DocumentError::Io {
                path: destination.to_path_buf(),
                source,
            });
        }

        info!(
            "event=document_save module=store status=ok path={} duration_ms={}",
            destination.display(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Saves back to the file the document was loaded from.
    pub fn save_to_source(&self) -> DocumentResult<()> {
        let path = self.source_path.as_deref().ok_or(DocumentError::NotLoaded)?;
        self.save(path)
    }

    /// Appends a root group and returns its generated id.
    ///
    /// The new group gets `position = root sibling count + 1`.
    pub fn add_group(&mut self, name: impl Into<String>) -> DocumentResult<GroupId> {
        let name = normalize_name(name.into())?;
        let document = self.doc_mut()?;
        let id = Uuid::new_v4().to_string();
        let position = document.groups.len() as i64 + 1;
        document.groups.push(Group::new(id.clone(), name, position));
        self.emit(DocumentChange::Groups);
        Ok(id)
    }

    /// Removes the first group matching `id`, subtree included.
    ///
    /// With `parent`, only that group's descendants are searched.
    pub fn remove_group(&mut self, id: &str, parent: Option<&str>) -> DocumentResult<Group> {
        let document = self.doc_mut()?;
        let removed = locate(&document.groups, id, parent)
            .and_then(|path| remove_at(&mut document.groups, &path))
            .ok_or_else(|| DocumentError::GroupNotFound(id.to_string()))?;
        self.emit(DocumentChange::Groups);
        Ok(removed)
    }

    pub fn rename_group(
        &mut self,
        id: &str,
        name: impl Into<String>,
        parent: Option<&str>,
    ) -> DocumentResult<()> {
        let name = normalize_name(name.into())?;
        self.group_mut(id, parent)?.name = name;
        self.emit(DocumentChange::Groups);
        Ok(())
    }

    /// Flips group visibility and returns the new state.
    pub fn toggle_group_visibility(&mut self, id: &str, parent: Option<&str>) -> DocumentResult<bool> {
        let group = self.group_mut(id, parent)?;
        group.visible = !group.visible;
        let visible = group.visible;
        self.emit(DocumentChange::Groups);
        Ok(visible)
    }

    /// Sets the lane style key. An empty category clears it.
    pub fn set_group_category(
        &mut self,
        id: &str,
        category: impl Into<String>,
        parent: Option<&str>,
    ) -> DocumentResult<()> {
        let category = category.into().trim().to_string();
        self.group_mut(id, parent)?.category = category;
        self.emit(DocumentChange::Groups);
        Ok(())
    }

    /// Replaces the whole forest, as done after a drag-reorder.
    pub fn replace_groups(&mut self, mut groups: Vec<Group>) -> DocumentResult<()> {
        if let Some(id) = find_duplicate_id(&groups) {
            return Err(DocumentError::DuplicateId(id.to_string()));
        }
        sort_forest(&mut groups);
        self.doc_mut()?.groups = groups;
        self.emit(DocumentChange::Groups);
        Ok(())
    }

    fn group_mut(&mut self, id: &str, parent: Option<&str>) -> DocumentResult<&mut Group> {
        let document = self.doc_mut()?;
        let path = locate(&document.groups, id, parent)
            .ok_or_else(|| DocumentError::GroupNotFound(id.to_string()))?;
        node_at_mut(&mut document.groups, &path)
            .ok_or_else(|| DocumentError::GroupNotFound(id.to_string()))
    }

    /// Returns one item by id.
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.document.as_ref()?.item(id)
    }

    /// Appends one item, creating its category on first use.
    pub fn add_item(&mut self, item: Item) -> DocumentResult<()> {
        if !item.has_id() {
            return Err(DocumentError::MissingId);
        }
        ensure_schedule(&item)?;
        let document = self.doc_mut()?;
        if document.items.iter().any(|existing| existing.id == item.id) {
            return Err(DocumentError::DuplicateId(item.id));
        }

        ensure_category(document, item.class_name.as_deref());
        debug!("event=item_add module=store status=ok id={}", item.id);
        document.items.push(item);
        self.emit(DocumentChange::Items);
        Ok(())
    }

    /// Applies the populated fields of `patch` to the matching item.
    pub fn update_item(&mut self, patch: &ItemPatch) -> DocumentResult<()> {
        let document = self.doc_mut()?;
        let item = document
            .items
            .iter_mut()
            .find(|item| item.id == patch.id)
            .ok_or_else(|| DocumentError::ItemNotFound(patch.id.clone()))?;
        let mut patched = item.clone();
        patch.apply_to(&mut patched);
        ensure_schedule(&patched)?;
        *item = patched;

        ensure_category(document, patch.class_name.as_ref().and_then(Option::as_deref));
        self.emit(DocumentChange::Items);
        Ok(())
    }

    pub fn remove_item(&mut self, id: &str) -> DocumentResult<Item> {
        let document = self.doc_mut()?;
        let index = document
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| DocumentError::ItemNotFound(id.to_string()))?;
        let removed = document.items.remove(index);
        self.emit(DocumentChange::Items);
        Ok(removed)
    }

    pub fn add_category(
        &mut self,
        class_name: impl Into<String>,
        style: CategoryStyle,
    ) -> DocumentResult<()> {
        let class_name = normalize_name(class_name.into())?;
        let document = self.doc_mut()?;
        if document.categories.contains_key(&class_name) {
            return Err(DocumentError::DuplicateId(class_name));
        }
        document.categories.insert(class_name, style);
        self.emit(DocumentChange::Categories);
        Ok(())
    }

    pub fn update_category(&mut self, class_name: &str, patch: &CategoryPatch) -> DocumentResult<()> {
        let style = self
            .doc_mut()?
            .categories
            .get_mut(class_name)
            .ok_or_else(|| DocumentError::CategoryNotFound(class_name.to_string()))?;
        patch.apply_to(style);
        self.emit(DocumentChange::Categories);
        Ok(())
    }

    /// Removes one category on explicit request. Items keep their `className`.
    pub fn remove_category(&mut self, class_name: &str) -> DocumentResult<CategoryStyle> {
        let removed = self
            .doc_mut()?
            .categories
            .remove(class_name)
            .ok_or_else(|| DocumentError::CategoryNotFound(class_name.to_string()))?;
        self.emit(DocumentChange::Categories);
        Ok(removed)
    }

    pub fn add_marker(
        &mut self,
        uuid: impl Into<String>,
        name: impl Into<String>,
        date: i64,
    ) -> DocumentResult<()> {
        let uuid = normalize_key(uuid.into())?;
        let document = self.doc_mut()?;
        if document.markers.contains_key(&uuid) {
            return Err(DocumentError::DuplicateId(uuid));
        }
        document.markers.insert(uuid, Marker::new(name, date));
        self.emit(DocumentChange::Markers);
        Ok(())
    }

    pub fn remove_marker(&mut self, uuid: &str) -> DocumentResult<Marker> {
        let removed = self
            .doc_mut()?
            .markers
            .remove(uuid)
            .ok_or_else(|| DocumentError::MarkerNotFound(uuid.to_string()))?;
        self.emit(DocumentChange::Markers);
        Ok(removed)
    }

    pub fn update_marker(&mut self, uuid: &str, patch: &MarkerPatch) -> DocumentResult<()> {
        let marker = self
            .doc_mut()?
            .markers
            .get_mut(uuid)
            .ok_or_else(|| DocumentError::MarkerNotFound(uuid.to_string()))?;
        patch.apply_to(marker);
        self.emit(DocumentChange::Markers);
        Ok(())
    }

    pub fn era(&self, uuid: &str) -> Option<&Era> {
        self.document.as_ref()?.eras.get(uuid)
    }

    /// Stores one era. `end > start` is not checked here; invalid eras are
    /// skipped at render time.
    pub fn add_era(&mut self, uuid: impl Into<String>, era: Era) -> DocumentResult<()> {
        let uuid = normalize_key(uuid.into())?;
        let document = self.doc_mut()?;
        if document.eras.contains_key(&uuid) {
            return Err(DocumentError::DuplicateId(uuid));
        }
        document.eras.insert(uuid, era);
        self.emit(DocumentChange::Eras);
        Ok(())
    }

    pub fn remove_era(&mut self, uuid: &str) -> DocumentResult<Era> {
        let removed = self
            .doc_mut()?
            .eras
            .remove(uuid)
            .ok_or_else(|| DocumentError::EraNotFound(uuid.to_string()))?;
        self.emit(DocumentChange::Eras);
        Ok(removed)
    }

    pub fn update_era(&mut self, uuid: &str, patch: &EraPatch) -> DocumentResult<()> {
        let era = self
            .doc_mut()?
            .eras
            .get_mut(uuid)
            .ok_or_else(|| DocumentError::EraNotFound(uuid.to_string()))?;
        patch.apply_to(era);
        self.emit(DocumentChange::Eras);
        Ok(())
    }

    /// Flips era visibility and returns the new state.
    pub fn toggle_era_visibility(&mut self, uuid: &str) -> DocumentResult<bool> {
        let era = self
            .doc_mut()?
            .eras
            .get_mut(uuid)
            .ok_or_else(|| DocumentError::EraNotFound(uuid.to_string()))?;
        era.visible = !era.visible;
        let visible = era.visible;
        self.emit(DocumentChange::Eras);
        Ok(visible)
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) -> DocumentResult<()> {
        let locale = normalize_name(locale.into())?;
        self.doc_mut()?.configuration.locale = locale;
        self.emit(DocumentChange::Configuration);
        Ok(())
    }

    pub fn set_display_window(&mut self, start: i64, end: i64) -> DocumentResult<()> {
        if end <= start {
            return Err(DocumentError::InvalidWindow { start, end });
        }
        let configuration = &mut self.doc_mut()?.configuration;
        configuration.start_date = Some(start);
        configuration.end_date = Some(end);
        self.emit(DocumentChange::Configuration);
        Ok(())
    }

    fn backfill_display_window(&mut self, start: i64, end: i64) {
        let already_set = self
            .document
            .as_ref()
            .is_some_and(|document| document.configuration.display_window().is_some());
        if already_set {
            debug!("event=display_window module=store status=skip reason=already_set");
            return;
        }
        match self.set_display_window(start, end) {
            Ok(()) => info!(
                "event=display_window module=store status=inferred start={start} end={end}"
            ),
            Err(err) => warn!("event=display_window module=store status=error error={err}"),
        }
    }

    /// Unsets the display window so the next render infers it again.
    pub fn clear_display_window(&mut self) -> DocumentResult<()> {
        let configuration = &mut self.doc_mut()?.configuration;
        configuration.start_date = None;
        configuration.end_date = None;
        self.emit(DocumentChange::Configuration);
        Ok(())
    }

    fn doc_mut(&mut self) -> DocumentResult<&mut Document> {
        self.document.as_mut().ok_or(DocumentError::NotLoaded)
    }

    fn emit(&mut self, change: DocumentChange) {
        let Some(document) = self.document.as_ref() else {
            return;
        };
        debug!(
            "event=document_changed module=store change={} listeners={}",
            change.as_str(),
            self.listeners.len()
        );
        for listener in self.listeners.iter_mut() {
            listener(change, document);
        }
        self.apply_deferred();
    }
}

/// Creates a default-style category for an unseen, non-blank class name.
fn ensure_category(document: &mut Document, class_name: Option<&str>) {
    let Some(class_name) = class_name.filter(|value| !value.trim().is_empty()) else {
        return;
    };
    if !document.categories.contains_key(class_name) {
        debug!("event=category_autocreate module=store status=ok class_name={class_name}");
        document
            .categories
            .insert(class_name.to_string(), CategoryStyle::default());
    }
}

/// Range items need an end that is not before their start.
fn ensure_schedule(item: &Item) -> DocumentResult<()> {
    let valid = match (item.kind, item.end) {
        (ItemType::Range, Some(end)) => end >= item.start,
        (ItemType::Range, None) => false,
        _ => true,
    };
    if valid {
        Ok(())
    } else {
        Err(DocumentError::InvalidSchedule(item.id.clone()))
    }
}

fn normalize_name(value: String) -> DocumentResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DocumentError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn normalize_key(value: String) -> DocumentResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DocumentError::MissingId);
    }
    Ok(trimmed.to_string())
}
