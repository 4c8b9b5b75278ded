//! Observable item store.
//!
//! # Responsibility
//! - Expose the checklist mutations (create, rename, complete, delete).
//! - Publish a fresh ordered snapshot to subscribers after every commit.
//!
//! # Invariants
//! - Creating with the exact empty string is a no-op: no write, no event.
//! - Notifications are delivered before the mutating call returns.
//! - Snapshots are ordered by `creation_date` descending.
//! - Stores built over the same feed notify each other's subscribers.
//! - A committed mutation reports success even when the follow-up
//!   snapshot read fails; the failed refresh is logged instead.

use crate::model::item::{Item, ItemId};
use crate::reactive::{ChangeFeed, Subscription};
use crate::repo::item_repo::{ItemRepository, RepoError, RepoResult};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;

/// What kind of mutation produced a [`StoreChange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Created(ItemId),
    Updated(ItemId),
    Deleted(Vec<ItemId>),
    Cleared { removed: usize },
}

/// Change event carrying the store contents after the mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub kind: ChangeKind,
    /// Full ordered snapshot, newest first.
    pub items: Vec<Item>,
}

/// Item store facade over a repository with change notification.
pub struct ItemStore<R: ItemRepository> {
    repo: R,
    feed: Rc<ChangeFeed<StoreChange>>,
}

impl<R: ItemRepository> ItemStore<R> {
    pub fn new(repo: R) -> Self {
        Self::with_feed(repo, Rc::new(ChangeFeed::new()))
    }

    /// Builds a store that publishes to, and is observed through, `feed`.
    ///
    /// Every store sharing one feed must wrap the same underlying storage.
    pub fn with_feed(repo: R, feed: Rc<ChangeFeed<StoreChange>>) -> Self {
        Self { repo, feed }
    }

    /// Creates and persists a new item.
    ///
    /// Returns `Ok(None)` without touching storage when `name` is `""`.
    /// Whitespace-only names are accepted as-is.
    pub fn create(&self, name: impl Into<String>) -> RepoResult<Option<Item>> {
        let name = name.into();
        if name.is_empty() {
            debug!("event=item_create module=store status=skipped reason=empty_name");
            return Ok(None);
        }

        let item = Item::new(name);
        self.repo.insert_item(&item)?;
        info!(
            "event=item_create module=store status=ok item_id={}",
            item.id
        );
        self.publish(ChangeKind::Created(item.id));
        Ok(Some(item))
    }

    pub fn get(&self, id: ItemId) -> RepoResult<Option<Item>> {
        self.repo.get_item(id)
    }

    /// Returns every item, newest first.
    pub fn list(&self) -> RepoResult<Vec<Item>> {
        self.repo.list_items()
    }

    /// Replaces the item name. No emptiness or length validation applies.
    pub fn rename(&self, id: ItemId, new_name: impl Into<String>) -> RepoResult<Item> {
        let new_name = new_name.into();
        self.modify(id, "item_rename", |item| item.name = new_name)
    }

    pub fn set_complete(&self, id: ItemId, complete: bool) -> RepoResult<Item> {
        self.modify(id, "item_set_complete", |item| item.complete = complete)
    }

    pub fn toggle_complete(&self, id: ItemId) -> RepoResult<Item> {
        self.modify(id, "item_toggle_complete", Item::toggle_complete)
    }

    /// Permanently removes one item.
    ///
    /// Deleting an id that is already gone returns `RepoError::NotFound`.
    pub fn delete(&self, id: ItemId) -> RepoResult<()> {
        self.repo.delete_item(id)?;
        info!("event=item_delete module=store status=ok item_id={id}");
        self.publish(ChangeKind::Deleted(vec![id]));
        Ok(())
    }

    /// Removes a batch of items atomically with a single notification.
    pub fn delete_many(&self, ids: &[ItemId]) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let removed = self.repo.delete_items(ids)?;
        info!("event=item_delete_batch module=store status=ok removed={removed}");
        self.publish(ChangeKind::Deleted(ids.to_vec()));
        Ok(removed)
    }

    /// Removes every item in the store.
    pub fn delete_all(&self) -> RepoResult<usize> {
        let removed = self.repo.delete_all_items()?;
        info!("event=item_delete_all module=store status=ok removed={removed}");
        self.publish(ChangeKind::Cleared { removed });
        Ok(removed)
    }

    /// Registers a callback invoked after every committed mutation.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl FnMut(&StoreChange) + 'static) -> Subscription {
        self.feed.subscribe(callback)
    }

    /// Opens a live view that always holds the latest snapshot.
    pub fn live(&self) -> RepoResult<LiveItems> {
        let snapshot = Rc::new(RefCell::new(self.list()?));
        let target = Rc::clone(&snapshot);
        let subscription = self.subscribe(move |change| {
            *target.borrow_mut() = change.items.clone();
        });

        Ok(LiveItems {
            snapshot,
            _subscription: subscription,
        })
    }

    fn modify(
        &self,
        id: ItemId,
        event: &'static str,
        apply: impl FnOnce(&mut Item),
    ) -> RepoResult<Item> {
        let mut item = match self.repo.get_item(id)? {
            Some(item) => item,
            None => {
                warn!("event={event} module=store status=error error_code=not_found item_id={id}");
                return Err(RepoError::NotFound(id));
            }
        };

        apply(&mut item);
        self.repo.update_item(&item)?;
        info!("event={event} module=store status=ok item_id={id}");
        self.publish(ChangeKind::Updated(id));
        Ok(item)
    }

    fn publish(&self, kind: ChangeKind) {
        if !self.feed.has_subscribers() {
            return;
        }

        let items = match self.repo.list_items() {
            Ok(items) => items,
            Err(err) => {
                warn!(
                    "event=store_refresh module=store status=error change={kind:?} error={err}"
                );
                return;
            }
        };
        self.feed.emit(&StoreChange { kind, items });
    }
}

/// Snapshot kept current by a store subscription.
pub struct LiveItems {
    snapshot: Rc<RefCell<Vec<Item>>>,
    _subscription: Subscription,
}

impl LiveItems {
    /// Clones the latest snapshot.
    pub fn items(&self) -> Vec<Item> {
        self.snapshot.borrow().clone()
    }

    /// Runs `f` against the latest snapshot without cloning it.
    pub fn with_items<T>(&self, f: impl FnOnce(&[Item]) -> T) -> T {
        f(self.snapshot.borrow().as_slice())
    }

    pub fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }
}
