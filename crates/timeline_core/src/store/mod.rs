//! Document store: the single owner of the timeline document.
//!
//! # Responsibility
//! - Own the loaded `Document` and expose every mutation as a method.
//! - Load/save the document file as one JSON object.
//! - Fan out one change notification per successful mutation.
//!
//! # Invariants
//! - Consumers only ever receive `&Document`.
//! - Failed mutations leave the document untouched and notify nobody.
//! - Listeners always observe a fully applied mutation.

pub mod deferred;
pub mod document_store;
pub mod group_tree;
pub mod listeners;
mod persistence;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub use deferred::{DeferredEdit, DeferredEdits};
pub use document_store::{DocumentListener, DocumentStore, LoadReport};
pub use listeners::{Listeners, SubscriptionId};

/// Which slice of the document a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentChange {
    /// Whole document replaced by `load`.
    Loaded,
    Configuration,
    Groups,
    Items,
    Categories,
    Eras,
    Markers,
}

impl DocumentChange {
    /// Stable name used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Configuration => "configuration",
            Self::Groups => "groups",
            Self::Items => "items",
            Self::Categories => "categories",
            Self::Eras => "eras",
            Self::Markers => "markers",
        }
    }

    /// Returns whether listeners for `other` must re-derive their view.
    pub fn touches(self, other: DocumentChange) -> bool {
        self == Self::Loaded || self == other
    }
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Rejection reasons for document store operations.
///
/// Every error means "no state change, no notification".
#[derive(Debug)]
pub enum DocumentError {
    /// No document has been loaded yet.
    NotLoaded,
    /// Required name is blank after trim.
    EmptyName,
    /// Record id/uuid is blank.
    MissingId,
    /// Record id/uuid already exists in its collection.
    DuplicateId(String),
    GroupNotFound(String),
    ItemNotFound(String),
    MarkerNotFound(String),
    EraNotFound(String),
    CategoryNotFound(String),
    /// Display window end is not after start.
    InvalidWindow { start: i64, end: i64 },
    /// Range item without an end, or ending before it starts.
    InvalidSchedule(String),
    /// Reading or writing the document file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize(serde_json::Error),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotLoaded => write!(f, "no document loaded"),
            Self::EmptyName => write!(f, "name must not be blank"),
            Self::MissingId => write!(f, "id must not be blank"),
            Self::DuplicateId(id) => write!(f, "id already exists: {id}"),
            Self::GroupNotFound(id) => write!(f, "group not found: {id}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::MarkerNotFound(id) => write!(f, "marker not found: {id}"),
            Self::EraNotFound(id) => write!(f, "era not found: {id}"),
            Self::CategoryNotFound(name) => write!(f, "category not found: {name}"),
            Self::InvalidWindow { start, end } => {
                write!(f, "display window end {end} must be after start {start}")
            }
            Self::InvalidSchedule(id) => {
                write!(f, "range item {id} needs an end not before its start")
            }
            Self::Io { path, source } => {
                write!(f, "document file `{}`: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to serialize document: {err}"),
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}
