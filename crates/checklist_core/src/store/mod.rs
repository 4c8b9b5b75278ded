//! Item Store: persistence-backed item collection with live reads.
//!
//! # Responsibility
//! - Turn repository writes into observable store mutations.
//! - Keep readers current without polling.

pub mod item_store;
