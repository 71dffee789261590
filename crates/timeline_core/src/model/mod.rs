//! Document model for the timeline editor.
//!
//! # Responsibility
//! - Define the canonical records persisted in the document file.
//! - Define patch values used for partial updates.
//!
//! # Invariants
//! - Group ids are unique across the whole forest.
//! - Item ids are unique within `Document::items`.
//! - Category entries are added monotonically and never pruned automatically.
//! - All timestamps are Unix epoch milliseconds.

pub mod category;
pub mod document;
pub mod era;
pub mod group;
pub mod item;
pub mod marker;
