// ABOUTME: Docker integration for locating the mailserver container and running its setup tool

pub mod error;
pub mod mailserver;
pub mod parse;

pub use error::MailserverError;
pub use mailserver::DockerMailserver;

/// Access to the mailserver container.
///
/// Implemented over bollard by [`DockerMailserver`]; tests substitute a fake.
#[allow(async_fn_in_trait)]
pub trait MailserverExec {
    /// Id of the running mailserver container, if any.
    async fn find_container(&self) -> Result<Option<String>, MailserverError>;

    /// Runs `args` inside the container and returns combined stdout and stderr.
    async fn exec(&self, container_id: &str, args: &[&str]) -> Result<String, MailserverError>;
}
