//! List controller for the checklist screen.
//!
//! # Responsibility
//! - Translate UI gestures into item store calls.
//! - Own display state (`show_completed`, pending "Delete All") and the
//!   persisted preferences, writing preference changes through.
//! - Build [`ChecklistView`] from the live snapshot.
//!
//! # Invariants
//! - Counts always reflect the whole store, never the filtered rows.
//! - Swipe removal is only accepted while `swipe_to_delete_is_on` is set.
//! - A batch of row offsets is validated in full before anything is deleted.

use crate::controller::view::{self, ChecklistView, ViewOptions, DEFAULT_HEADER_LABEL};
use crate::model::item::{Item, ItemId};
use crate::prefs::{PreferenceStore, Preferences, PrefsError};
use crate::repo::item_repo::{ItemRepository, RepoError};
use crate::store::item_store::{ItemStore, LiveItems};
use log::{info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ControllerResult<T> = Result<T, ControllerError>;

#[derive(Debug)]
pub enum ControllerError {
    Repo(RepoError),
    Prefs(PrefsError),
    /// Swipe removal requested while the preference is off.
    SwipeDeleteDisabled,
    /// Row offset past the end of the rendered sequence.
    RowOutOfRange { offset: usize, row_count: usize },
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Prefs(err) => write!(f, "{err}"),
            Self::SwipeDeleteDisabled => write!(f, "swipe to delete is turned off"),
            Self::RowOutOfRange { offset, row_count } => {
                write!(f, "row offset {offset} is out of range for {row_count} row(s)")
            }
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Prefs(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ControllerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<PrefsError> for ControllerError {
    fn from(value: PrefsError) -> Self {
        Self::Prefs(value)
    }
}

/// Mediates between presentation gestures and the item store.
pub struct ListController<R: ItemRepository, P: PreferenceStore> {
    store: ItemStore<R>,
    live: LiveItems,
    pref_store: P,
    prefs: Preferences,
    header_label: String,
    show_completed: bool,
    pending_delete_all: bool,
}

impl<R: ItemRepository, P: PreferenceStore> ListController<R, P> {
    /// Builds a controller, reading preferences once from `pref_store`.
    pub fn new(repo: R, pref_store: P) -> ControllerResult<Self> {
        let prefs = pref_store.load()?;
        Self::with_preferences(repo, pref_store, prefs)
    }

    /// Builds a controller from preferences the caller already loaded.
    pub fn with_preferences(repo: R, pref_store: P, prefs: Preferences) -> ControllerResult<Self> {
        Self::from_store(ItemStore::new(repo), pref_store, prefs)
    }

    /// Builds a controller over an existing store, for instance one that
    /// shares its change feed with other controllers.
    pub fn from_store(
        store: ItemStore<R>,
        pref_store: P,
        prefs: Preferences,
    ) -> ControllerResult<Self> {
        let live = store.live()?;
        Ok(Self {
            store,
            live,
            pref_store,
            prefs,
            header_label: DEFAULT_HEADER_LABEL.to_string(),
            show_completed: true,
            pending_delete_all: false,
        })
    }

    pub fn with_header_label(mut self, label: impl Into<String>) -> Self {
        self.header_label = label.into();
        self
    }

    pub fn store(&self) -> &ItemStore<R> {
        &self.store
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    pub fn show_completed(&self) -> bool {
        self.show_completed
    }

    /// Latest snapshot of the whole store, newest first.
    pub fn items(&self) -> Vec<Item> {
        self.live.items()
    }

    pub fn uncompleted_count(&self) -> usize {
        self.live.with_items(view::uncompleted_count)
    }

    pub fn total_count(&self) -> usize {
        self.live.with_items(view::total_count)
    }

    /// Rendered sequence under the current `show_completed` setting.
    pub fn visible_items(&self) -> Vec<Item> {
        self.live
            .with_items(|items| view::visible_items(items, self.show_completed))
    }

    pub fn view(&self) -> ChecklistView {
        let options = ViewOptions {
            header_label: &self.header_label,
            show_completed: self.show_completed,
            swipe_to_delete_is_on: self.prefs.swipe_to_delete_is_on,
            pending_delete_all: self.pending_delete_all,
        };
        self.live
            .with_items(|items| ChecklistView::build(items, options))
    }

    /// Submits the new-item text field. `""` is ignored.
    pub fn submit_new_item(&mut self, text: &str) -> ControllerResult<Option<Item>> {
        Ok(self.store.create(text)?)
    }

    pub fn rename_item(&mut self, id: ItemId, new_name: &str) -> ControllerResult<Item> {
        Ok(self.store.rename(id, new_name)?)
    }

    pub fn set_complete(&mut self, id: ItemId, complete: bool) -> ControllerResult<Item> {
        Ok(self.store.set_complete(id, complete)?)
    }

    pub fn toggle_complete(&mut self, id: ItemId) -> ControllerResult<Item> {
        Ok(self.store.toggle_complete(id)?)
    }

    /// Inline delete control on a row.
    pub fn delete_item(&mut self, id: ItemId) -> ControllerResult<()> {
        Ok(self.store.delete(id)?)
    }

    /// Swipe removal by position in the rendered sequence.
    ///
    /// Duplicate offsets collapse; the whole batch is rejected if any offset
    /// is out of range.
    pub fn delete_at_offsets(&mut self, offsets: &[usize]) -> ControllerResult<usize> {
        if !self.prefs.swipe_to_delete_is_on {
            warn!("event=rows_delete module=controller status=rejected reason=swipe_disabled");
            return Err(ControllerError::SwipeDeleteDisabled);
        }

        let rows = self.visible_items();
        let unique = offsets.iter().copied().collect::<BTreeSet<_>>();
        let mut ids = Vec::with_capacity(unique.len());
        for offset in unique {
            let row = rows.get(offset).ok_or(ControllerError::RowOutOfRange {
                offset,
                row_count: rows.len(),
            })?;
            ids.push(row.id);
        }

        Ok(self.store.delete_many(&ids)?)
    }

    /// First step of "Delete All": asks for confirmation.
    pub fn request_delete_all(&mut self) {
        self.pending_delete_all = true;
    }

    pub fn cancel_delete_all(&mut self) {
        self.pending_delete_all = false;
    }

    /// Deletes every item if a request is pending; otherwise does nothing.
    pub fn confirm_delete_all(&mut self) -> ControllerResult<usize> {
        if !self.pending_delete_all {
            return Ok(0);
        }
        self.pending_delete_all = false;
        Ok(self.store.delete_all()?)
    }

    /// Unconditional bulk delete.
    pub fn delete_all(&mut self) -> ControllerResult<usize> {
        self.pending_delete_all = false;
        Ok(self.store.delete_all()?)
    }

    pub fn set_show_completed(&mut self, show_completed: bool) {
        self.show_completed = show_completed;
    }

    pub fn toggle_show_completed(&mut self) -> bool {
        self.show_completed = !self.show_completed;
        self.show_completed
    }

    /// Updates the swipe preference and persists it immediately.
    ///
    /// The in-memory value is only changed once the write succeeds.
    pub fn set_swipe_to_delete(&mut self, enabled: bool) -> ControllerResult<()> {
        let mut next = self.prefs;
        next.swipe_to_delete_is_on = enabled;
        self.pref_store.save(&next)?;
        self.prefs = next;
        info!("event=pref_change module=controller status=ok swipe_to_delete={enabled}");
        Ok(())
    }

    pub fn toggle_swipe_to_delete(&mut self) -> ControllerResult<bool> {
        let enabled = !self.prefs.swipe_to_delete_is_on;
        self.set_swipe_to_delete(enabled)?;
        Ok(enabled)
    }
}
