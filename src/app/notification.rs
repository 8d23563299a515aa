// ABOUTME: Notification records shown to users as transient toasts
// A notification is an immutable value; the store holds shared handles to them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Severity of a notification. Consumers pick the visual treatment from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Error,
    Success,
    Info,
    Warning,
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub category: NotificationCategory,
}

impl Notification {
    pub fn new(text: impl Into<String>, category: NotificationCategory) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, NotificationCategory::Success)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, NotificationCategory::Error)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, NotificationCategory::Info)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(text, NotificationCategory::Warning)
    }
}

/// A notification as placed in the store.
///
/// Equality compares content; identity is the allocation, so two toasts
/// with the same text are still independent entries (see [`Rc::ptr_eq`]).
pub type Toast = Rc<Notification>;

/// The ordered notification collection held by the store.
pub type Toasts = Vec<Toast>;
