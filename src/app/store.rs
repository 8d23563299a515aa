// ABOUTME: Single-threaded reactive store that broadcasts every committed value to its subscribers
// Commits apply immediately and are delivered in order; commits made during delivery are queued

use crate::app::notification::{Notification, Toast, Toasts};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};
use tracing::{debug, error, warn};

type Callback<T> = Box<dyn FnMut(&T)>;

struct Subscriber<T> {
    id: u64,
    /// Version of the value handed to the callback when it subscribed.
    since: u64,
    active: Cell<bool>,
    callback: RefCell<Callback<T>>,
}

impl<T> Subscriber<T> {
    fn notify(&self, value: &T) {
        if !self.active.get() {
            return;
        }

        let Ok(mut guard) = self.callback.try_borrow_mut() else {
            warn!(subscriber = self.id, "Subscriber is already running, skipping delivery");
            return;
        };
        let callback = &mut *guard;

        if panic::catch_unwind(AssertUnwindSafe(|| callback(value))).is_err() {
            error!(subscriber = self.id, "Store subscriber panicked during delivery");
        }
    }
}

struct Shared<T> {
    value: RefCell<T>,
    version: Cell<u64>,
    subscribers: RefCell<Vec<Rc<Subscriber<T>>>>,
    // Committed values waiting to be delivered, tagged with their version
    pending: RefCell<VecDeque<(u64, T)>>,
    delivering: Cell<bool>,
    next_id: Cell<u64>,
}

/// A writable value with change notification.
///
/// Cloning a `Store` yields another handle to the same state. The store is
/// meant for a single thread: every operation runs to completion and
/// subscribers are called synchronously before `set`/`update` return.
///
/// Delivery guarantees:
/// - subscribers see every commit exactly once, in commit order, in
///   registration order;
/// - a commit issued from inside a callback is delivered only after the
///   current commit reached every subscriber;
/// - a callback that panics is logged and skipped; the others still run.
pub struct Store<T> {
    shared: Rc<Shared<T>>,
}

impl<T: Clone + 'static> Store<T> {
    pub fn new(initial: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                value: RefCell::new(initial),
                version: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
                pending: RefCell::new(VecDeque::new()),
                delivering: Cell::new(false),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Returns the committed value.
    pub fn get(&self) -> T {
        self.shared.value.borrow().clone()
    }

    /// Number of commits since the store was created.
    pub fn version(&self) -> u64 {
        self.shared.version.get()
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.borrow().len()
    }

    /// Replaces the value and notifies every subscriber.
    pub fn set(&self, value: T) {
        let version = self.shared.version.get() + 1;
        self.shared.version.set(version);
        *self.shared.value.borrow_mut() = value.clone();
        self.shared.pending.borrow_mut().push_back((version, value));
        self.flush();
    }

    /// Commits `transform(current)` as a single step.
    pub fn update<F>(&self, transform: F)
    where
        F: FnOnce(&T) -> T,
    {
        let current = self.get();
        self.set(transform(&current));
    }

    /// Registers `callback`, calling it right away with the current value and
    /// then after every commit until the returned handle is unsubscribed.
    pub fn subscribe<F>(&self, callback: F) -> Subscription<T>
    where
        F: FnMut(&T) + 'static,
    {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id + 1);

        let current = self.get();
        let subscriber = Rc::new(Subscriber {
            id,
            since: self.shared.version.get(),
            active: Cell::new(true),
            callback: RefCell::new(Box::new(callback)),
        });
        self.shared
            .subscribers
            .borrow_mut()
            .push(Rc::clone(&subscriber));
        debug!(subscriber = id, "Store subscriber registered");

        // Commits made by the initial call are queued like any re-entrant commit
        let nested = self.shared.delivering.replace(true);
        subscriber.notify(&current);
        if !nested {
            self.shared.delivering.set(false);
            self.flush();
        }

        Subscription {
            shared: Rc::downgrade(&self.shared),
            subscriber,
        }
    }

    fn flush(&self) {
        if self.shared.delivering.replace(true) {
            return;
        }

        loop {
            let next = self.shared.pending.borrow_mut().pop_front();
            let Some((version, value)) = next else {
                break;
            };

            let subscribers = self.shared.subscribers.borrow().clone();
            for subscriber in subscribers.iter().filter(|s| s.since < version) {
                subscriber.notify(&value);
            }
        }

        self.shared.delivering.set(false);
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: Clone + Default + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("version", &self.shared.version.get())
            .field("subscribers", &self.shared.subscribers.borrow().len())
            .finish()
    }
}

/// Handle returned by [`Store::subscribe`].
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription<T> {
    shared: Weak<Shared<T>>,
    subscriber: Rc<Subscriber<T>>,
}

impl<T> Subscription<T> {
    /// Stops further deliveries. Calling it again has no effect.
    ///
    /// Takes effect immediately, also for a commit currently being delivered
    /// when this callback has not been reached yet.
    pub fn unsubscribe(&self) {
        if !self.subscriber.active.replace(false) {
            return;
        }

        if let Some(shared) = self.shared.upgrade() {
            shared
                .subscribers
                .borrow_mut()
                .retain(|s| s.id != self.subscriber.id);
        }
        debug!(subscriber = self.subscriber.id, "Store subscriber removed");
    }

    pub fn is_active(&self) -> bool {
        self.subscriber.active.get()
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.subscriber.id)
            .field("active", &self.subscriber.active.get())
            .finish()
    }
}

/// The application-wide toast container.
pub type NotificationStore = Store<Toasts>;

impl Store<Toasts> {
    /// Appends a notification and returns the toast handle that identifies it.
    pub fn push(&self, notification: Notification) -> Toast {
        let toast = Rc::new(notification);
        let appended = Rc::clone(&toast);
        self.update(move |toasts| {
            let mut next = toasts.clone();
            next.push(appended);
            next
        });
        toast
    }

    /// Removes `toast` by identity. Nothing is committed when it is absent.
    pub fn remove(&self, toast: &Toast) -> bool {
        let current = self.get();
        if !current.iter().any(|t| Rc::ptr_eq(t, toast)) {
            return false;
        }

        self.set(
            current
                .into_iter()
                .filter(|t| !Rc::ptr_eq(t, toast))
                .collect(),
        );
        true
    }

    /// Removes the toast at `index`. Nothing is committed when out of range.
    pub fn remove_at(&self, index: usize) -> Option<Toast> {
        let mut current = self.get();
        if index >= current.len() {
            return None;
        }

        let removed = current.remove(index);
        self.set(current);
        Some(removed)
    }

    pub fn clear(&self) {
        self.set(Vec::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_counts_commits() {
        let store = Store::new(0_u32);
        assert_eq!(store.version(), 0);
        store.set(4);
        store.update(|v| v + 1);
        assert_eq!(store.version(), 2);
        assert_eq!(store.get(), 5);
    }

    #[test]
    fn test_clone_shares_state() {
        let store = NotificationStore::default();
        let handle = store.clone();
        handle.push(Notification::info("shared"));
        assert_eq!(store.get().len(), 1);
    }

    #[test]
    fn test_remove_absent_does_not_commit() {
        let store = NotificationStore::default();
        store.push(Notification::info("kept"));
        let stranger = Rc::new(Notification::info("kept"));

        assert!(!store.remove(&stranger));
        assert_eq!(store.version(), 1);
        assert_eq!(store.remove_at(3), None);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_subscriber_list_shrinks_on_unsubscribe() {
        let store = Store::new(String::new());
        let first = store.subscribe(|_| {});
        let _second = store.subscribe(|_| {});
        assert_eq!(store.subscriber_count(), 2);

        first.unsubscribe();
        assert_eq!(store.subscriber_count(), 1);
        assert!(!first.is_active());
    }
}
