//! Checklist item domain model.
//!
//! # Responsibility
//! - Define the single persisted record of the checklist.
//! - Provide construction helpers that assign identity and creation time.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `creation_date` is assigned once and never changes.
//! - Only creation guards against an empty name; renames accept any text.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a checklist item.
pub type ItemId = Uuid;

/// One checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable ID assigned at creation.
    pub id: ItemId,
    /// User-editable label. Duplicates are allowed.
    pub name: String,
    /// Completion flag, `false` on creation.
    pub complete: bool,
    /// Unix epoch milliseconds. Default sort key (newest first).
    pub creation_date: i64,
}

impl Item {
    /// Creates a new incomplete item stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, now_epoch_ms())
    }

    /// Creates an item with caller-provided identity and creation time.
    ///
    /// Used by read-back paths where identity already exists.
    pub fn with_id(id: ItemId, name: impl Into<String>, creation_date: i64) -> Self {
        Self {
            id,
            name: name.into(),
            complete: false,
            creation_date,
        }
    }

    /// Flips the completion flag.
    pub fn toggle_complete(&mut self) {
        self.complete = !self.complete;
    }

    /// Counts toward the header's uncompleted total and stays visible while
    /// completed items are hidden.
    pub fn is_pending(&self) -> bool {
        !self.complete
    }
}

/// Returns the current wall-clock time in Unix epoch milliseconds.
///
/// Clocks set before 1970 clamp to `0`.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
