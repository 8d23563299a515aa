// ABOUTME: Consumer side of the toast store: shows new toasts, retires removed ones, expires old ones
// Expiry policy lives here; the store itself never removes anything on its own

use crate::app::notification::{Notification, NotificationCategory, Toast, Toasts};
use crate::app::store::{NotificationStore, Subscription};
use crossterm::style::Stylize;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Default time a toast stays on screen.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(5);

/// Presentation seam for toasts.
#[cfg_attr(test, mockall::automock)]
pub trait ToastRenderer {
    fn show(&mut self, notification: &Notification);
    fn retire(&mut self, notification: &Notification);
}

/// Prints toasts to stderr so stdout stays machine readable.
#[derive(Debug, Default)]
pub struct ConsoleRenderer;

impl ToastRenderer for ConsoleRenderer {
    fn show(&mut self, notification: &Notification) {
        let label = match notification.category {
            NotificationCategory::Error => "✖ error".red().bold(),
            NotificationCategory::Success => "✔ success".green().bold(),
            NotificationCategory::Info => "ℹ info".blue().bold(),
            NotificationCategory::Warning => "⚠ warning".yellow().bold(),
        };
        eprintln!("{} {}", label, notification.text);
    }

    fn retire(&mut self, notification: &Notification) {
        debug!("Toast retired: {}", notification.text);
    }
}

struct DisplayedToast {
    toast: Toast,
    shown_at: Instant,
}

struct BoardState<R> {
    renderer: R,
    displayed: Vec<DisplayedToast>,
}

impl<R: ToastRenderer> BoardState<R> {
    fn sync(&mut self, toasts: &Toasts, now: Instant) {
        let (mut kept, gone): (Vec<_>, Vec<_>) = std::mem::take(&mut self.displayed)
            .into_iter()
            .partition(|d| toasts.iter().any(|t| Rc::ptr_eq(t, &d.toast)));

        let mut next = Vec::with_capacity(toasts.len());
        let mut fresh = Vec::new();
        for toast in toasts {
            if let Some(pos) = kept.iter().position(|d| Rc::ptr_eq(&d.toast, toast)) {
                next.push(kept.swap_remove(pos));
            } else {
                fresh.push(Rc::clone(toast));
                next.push(DisplayedToast {
                    toast: Rc::clone(toast),
                    shown_at: now,
                });
            }
        }
        // The board mirrors the store even when a renderer call below fails
        self.displayed = next;

        for entry in &gone {
            self.render("retire", &entry.toast, |renderer, n| renderer.retire(n));
        }
        for toast in &fresh {
            self.render("show", toast, |renderer, n| renderer.show(n));
        }
    }

    fn render(&mut self, action: &str, toast: &Toast, call: impl FnOnce(&mut R, &Notification)) {
        let renderer = &mut self.renderer;
        let notification: &Notification = toast;
        if panic::catch_unwind(AssertUnwindSafe(|| call(renderer, notification))).is_err() {
            error!("Toast renderer panicked on {}: {}", action, toast.text);
        }
    }
}

/// Mirrors the store onto a [`ToastRenderer`] and retires toasts after a
/// fixed display duration.
pub struct ToastBoard<R> {
    store: NotificationStore,
    state: Rc<RefCell<BoardState<R>>>,
    subscription: Subscription<Toasts>,
    duration: Duration,
}

impl<R: ToastRenderer + 'static> ToastBoard<R> {
    pub fn new(store: &NotificationStore, renderer: R, duration: Duration) -> Self {
        let state = Rc::new(RefCell::new(BoardState {
            renderer,
            displayed: Vec::new(),
        }));

        let sink = Rc::clone(&state);
        let subscription = store.subscribe(move |toasts: &Toasts| {
            sink.borrow_mut().sync(toasts, Instant::now());
        });

        Self {
            store: store.clone(),
            state,
            subscription,
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Toasts currently on display, in store order.
    pub fn visible(&self) -> Toasts {
        self.state
            .borrow()
            .displayed
            .iter()
            .map(|d| Rc::clone(&d.toast))
            .collect()
    }

    /// Removes every toast shown for longer than the display duration.
    /// Returns how many were removed.
    pub fn tick(&self, now: Instant) -> usize {
        let expired: Toasts = self
            .state
            .borrow()
            .displayed
            .iter()
            .filter(|d| now.saturating_duration_since(d.shown_at) > self.duration)
            .map(|d| Rc::clone(&d.toast))
            .collect();

        if expired.is_empty() {
            return 0;
        }

        let before = self.store.get().len();
        self.store.update(|toasts| {
            toasts
                .iter()
                .filter(|t| !expired.iter().any(|e| Rc::ptr_eq(*t, e)))
                .cloned()
                .collect()
        });
        let removed = before.saturating_sub(self.store.get().len());
        debug!("Expired {} toast(s)", removed);
        removed
    }

    /// Removes the toast at `index`, as on explicit user dismissal.
    pub fn dismiss(&self, index: usize) -> bool {
        self.store.remove_at(index).is_some()
    }

    /// Stops mirroring the store. Toasts already shown are left alone.
    /// Dropping the board detaches it as well.
    pub fn detach(&self) {
        self.subscription.unsubscribe();
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_active()
    }
}

impl<R> Drop for ToastBoard<R> {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::always;

    #[test]
    fn test_renderer_sees_show_then_retire() {
        let store = NotificationStore::default();
        let mut renderer = MockToastRenderer::new();
        renderer
            .expect_show()
            .withf(|n: &Notification| n.text == "Alias created")
            .times(1)
            .return_const(());
        renderer
            .expect_retire()
            .withf(|n: &Notification| n.text == "Alias created")
            .times(1)
            .return_const(());

        let board = ToastBoard::new(&store, renderer, DEFAULT_TOAST_DURATION);
        let toast = store.push(Notification::success("Alias created"));
        assert_eq!(board.visible().len(), 1);

        assert!(store.remove(&toast));
        assert!(board.visible().is_empty());
    }

    #[test]
    fn test_existing_toasts_shown_on_attach() {
        let store = NotificationStore::default();
        store.push(Notification::info("one"));
        store.push(Notification::info("two"));

        let mut renderer = MockToastRenderer::new();
        renderer.expect_show().with(always()).times(2).return_const(());
        renderer.expect_retire().never();

        let board = ToastBoard::new(&store, renderer, DEFAULT_TOAST_DURATION);
        assert_eq!(board.visible().len(), 2);
    }

    #[test]
    fn test_unchanged_toasts_not_shown_twice() {
        let store = NotificationStore::default();
        let mut renderer = MockToastRenderer::new();
        renderer.expect_show().times(2).return_const(());
        renderer.expect_retire().never();

        let _board = ToastBoard::new(&store, renderer, DEFAULT_TOAST_DURATION);
        store.push(Notification::info("first"));
        store.push(Notification::info("second"));
    }
}
