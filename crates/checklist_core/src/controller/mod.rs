//! List controller and derived display state.
//!
//! # Responsibility
//! - Mediate user gestures into item store operations.
//! - Compute counts and the filtered row sequence for rendering.

pub mod list_controller;
pub mod view;
