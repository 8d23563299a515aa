// ABOUTME: Response shapes for status, email and alias operations, serialized as JSON

use serde::{Deserialize, Serialize};

/// Image name fragment identifying the mailserver container.
pub const DOCKER_IMAGE: &str = "mailserver/docker-mailserver";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailsListResponse {
    pub emails: Vec<String>,
}

/// An alias and the mailbox it forwards to. Also the request body for
/// alias creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasResponse {
    pub alias: String,
    pub email: String,
}

impl AliasResponse {
    pub fn new(alias: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasListResponse {
    pub aliases: Vec<AliasResponse>,
}

impl AliasListResponse {
    pub fn find(&self, alias: &str) -> Option<&AliasResponse> {
        self.aliases.iter().find(|a| a.alias == alias)
    }
}
