//! Checklist domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - Deletion is permanent; there is no tombstone state.

pub mod item;
