// ABOUTME: Mailserver operations (status, emails, aliases) built on the container exec seam
// Validation order for new aliases: duplicate alias, unknown mailbox, malformed (or empty) alias

use crate::docker::parse::{is_valid_address, parse_alias_list, parse_email_list};
use crate::docker::{MailserverError, MailserverExec};
use crate::models::{AliasListResponse, AliasResponse, EmailsListResponse, StatusResponse};
use tracing::{debug, info};

pub struct MailserverService<E> {
    exec: E,
}

impl<E: MailserverExec> MailserverService<E> {
    pub fn new(exec: E) -> Self {
        Self { exec }
    }

    pub async fn status(&self) -> Result<StatusResponse, MailserverError> {
        let running = self.exec.find_container().await?.is_some();
        debug!("Mailserver running: {}", running);
        Ok(StatusResponse { running })
    }

    pub async fn emails(&self) -> Result<EmailsListResponse, MailserverError> {
        let container = self.container().await?;
        let emails = self.list_emails(&container).await?;
        Ok(EmailsListResponse { emails })
    }

    pub async fn aliases(&self) -> Result<AliasListResponse, MailserverError> {
        let container = self.container().await?;
        self.list_aliases(&container).await
    }

    pub async fn add_alias(&self, alias: AliasResponse) -> Result<AliasResponse, MailserverError> {
        let container = self.container().await?;

        if self.list_aliases(&container).await?.find(&alias.alias).is_some() {
            return Err(MailserverError::AliasExists);
        }

        if !self.list_emails(&container).await?.contains(&alias.email) {
            return Err(MailserverError::EmailNotFound);
        }

        if !is_valid_address(&alias.alias) {
            return Err(MailserverError::InvalidAlias);
        }

        self.exec
            .exec(&container, &["setup", "alias", "add", alias.alias.as_str(), alias.email.as_str()])
            .await?;
        info!("Added alias {} -> {}", alias.alias, alias.email);
        Ok(alias)
    }

    /// Deletes `alias` and returns the entry that was removed.
    pub async fn delete_alias(&self, alias: &str) -> Result<AliasResponse, MailserverError> {
        if alias.trim().is_empty() {
            return Err(MailserverError::MissingAlias);
        }

        let container = self.container().await?;
        let existing = self
            .list_aliases(&container)
            .await?
            .find(alias)
            .cloned()
            .ok_or(MailserverError::AliasNotFound)?;

        self.exec
            .exec(&container, &["setup", "alias", "del", existing.alias.as_str(), existing.email.as_str()])
            .await?;
        info!("Deleted alias {} -> {}", existing.alias, existing.email);
        Ok(existing)
    }

    async fn container(&self) -> Result<String, MailserverError> {
        self.exec
            .find_container()
            .await?
            .ok_or(MailserverError::ContainerNotFound)
    }

    async fn list_emails(&self, container: &str) -> Result<Vec<String>, MailserverError> {
        let output = self.exec.exec(container, &["setup", "email", "list"]).await?;
        Ok(parse_email_list(&output))
    }

    async fn list_aliases(&self, container: &str) -> Result<AliasListResponse, MailserverError> {
        let output = self.exec.exec(container, &["setup", "alias", "list"]).await?;
        Ok(parse_alias_list(&output))
    }
}
