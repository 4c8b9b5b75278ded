//! Single-threaded change notification primitive.
//!
//! # Responsibility
//! - Fan out change events to registered callbacks synchronously.
//! - Tie callback lifetime to an RAII [`Subscription`] guard.
//!
//! # Invariants
//! - Subscribers are notified in registration order.
//! - Dropping a `Subscription` removes its callback; once dropped, the
//!   callback is never invoked again, even later in the same emit.
//! - Callbacks may subscribe or unsubscribe while an emit is running;
//!   callbacks added during an emit first run on the next one.
//! - A callback re-entered by a nested emit is skipped, not re-borrowed.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Callback<E> = Box<dyn FnMut(&E)>;

struct Subscriber<E> {
    id: u64,
    callback: Rc<RefCell<Callback<E>>>,
}

/// Ordered list of callbacks interested in events of type `E`.
pub struct ChangeFeed<E> {
    subscribers: Rc<RefCell<Vec<Subscriber<E>>>>,
    next_id: Cell<u64>,
}

impl<E: 'static> ChangeFeed<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    /// Registers `callback`; it stays active until the returned guard drops.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl FnMut(&E) + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().push(Subscriber {
            id,
            callback: Rc::new(RefCell::new(Box::new(callback))),
        });

        let weak: Weak<RefCell<Vec<Subscriber<E>>>> = Rc::downgrade(&self.subscribers);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(subscribers) = weak.upgrade() {
                    subscribers
                        .borrow_mut()
                        .retain(|subscriber| subscriber.id != id);
                }
            })),
        }
    }

    /// Delivers `event` to every active subscriber.
    pub fn emit(&self, event: &E) {
        let pending = self
            .subscribers
            .borrow()
            .iter()
            .map(|subscriber| (subscriber.id, Rc::clone(&subscriber.callback)))
            .collect::<Vec<_>>();

        for (id, callback) in pending {
            if !self.is_registered(id) {
                continue;
            }
            if let Ok(mut guard) = callback.try_borrow_mut() {
                let run = &mut *guard;
                run(event);
            }
        }
    }

    fn is_registered(&self, id: u64) -> bool {
        self.subscribers
            .borrow()
            .iter()
            .any(|subscriber| subscriber.id == id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn has_subscribers(&self) -> bool {
        !self.subscribers.borrow().is_empty()
    }
}

impl<E: 'static> Default for ChangeFeed<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard for a feed callback. Dropping it unsubscribes.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Keeps the callback registered for the lifetime of the feed.
    pub fn forget(mut self) {
        self.detach = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}
