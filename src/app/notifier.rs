// ABOUTME: Producer side of the toast store, turning mailserver outcomes into notifications

use crate::app::notification::{Notification, Toast};
use crate::app::store::NotificationStore;
use crate::docker::MailserverError;
use crate::models::{AliasResponse, ErrorResponse, StatusResponse};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Notifier {
    store: NotificationStore,
}

impl Notifier {
    pub fn new(store: NotificationStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    pub fn success(&self, text: impl Into<String>) -> Toast {
        self.store.push(Notification::success(text))
    }

    pub fn info(&self, text: impl Into<String>) -> Toast {
        self.store.push(Notification::info(text))
    }

    pub fn warning(&self, text: impl Into<String>) -> Toast {
        self.store.push(Notification::warning(text))
    }

    pub fn error(&self, response: &ErrorResponse) -> Toast {
        self.store.push(Notification::error(response.error.clone()))
    }

    pub fn alias_created(&self, alias: &AliasResponse) -> Toast {
        info!("Alias {} created for {}", alias.alias, alias.email);
        self.success(format!("Alias {} → {} created", alias.alias, alias.email))
    }

    pub fn alias_deleted(&self, alias: &str) -> Toast {
        info!("Alias {} deleted", alias);
        self.success(format!("Alias {alias} deleted"))
    }

    pub fn status(&self, status: &StatusResponse) -> Toast {
        if status.running {
            self.info("Mailserver is running")
        } else {
            self.warning("Mailserver is not running")
        }
    }

    /// Only notifies when the running state differs from `previous`.
    pub fn status_changed(&self, previous: Option<bool>, status: &StatusResponse) -> Option<Toast> {
        if previous == Some(status.running) {
            return None;
        }
        Some(self.status(status))
    }

    /// Passes successful values through; failures become error toasts.
    pub fn report<T>(&self, result: Result<T, MailserverError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Mailserver operation failed: {}", e);
                self.error(&ErrorResponse::from(&e));
                None
            }
        }
    }
}
