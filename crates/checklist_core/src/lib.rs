//! Core data and interaction model for the checklist app.
//! This crate is the single source of truth for item and preference invariants.

pub mod app;
pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod reactive;
pub mod repo;
pub mod store;

pub use app::{
    open_checklist, AppError, AppResult, ChecklistConfig, ChecklistStorage, StorageController,
};
pub use controller::list_controller::{ControllerError, ControllerResult, ListController};
pub use controller::view::{
    header_text, total_count, uncompleted_count, visible_items, ChecklistView, RowAffordances,
    DEFAULT_HEADER_LABEL, EMPTY_STATE_MESSAGE,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Item, ItemId};
pub use prefs::{
    CachedPreferenceStore, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore,
    Preferences, PrefsError,
};
pub use reactive::{ChangeFeed, Subscription};
pub use repo::item_repo::{ItemRepository, RepoError, RepoResult, SqliteItemRepository};
pub use store::item_store::{ChangeKind, ItemStore, LiveItems, StoreChange};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
