// ABOUTME: Application layer: the reactive toast store with its producers and consumers

pub mod notification;
pub mod notifier;
pub mod service;
pub mod state;
pub mod store;
pub mod toast_board;

pub use notification::{Notification, NotificationCategory, Toast, Toasts};
pub use notifier::Notifier;
pub use service::MailserverService;
pub use state::App;
pub use store::{NotificationStore, Store, Subscription};
pub use toast_board::{ConsoleRenderer, ToastBoard, ToastRenderer, DEFAULT_TOAST_DURATION};
