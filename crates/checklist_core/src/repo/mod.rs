//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for checklist items.
//! - Isolate SQLite query details from store/controller orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod item_repo;
