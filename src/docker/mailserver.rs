// ABOUTME: Bollard-backed access to the docker-mailserver container
// Finds the container by image name and runs `setup` commands through docker exec

use super::{MailserverError, MailserverExec};
use crate::config::DockerConfig;
use bollard::container::{ListContainersOptions, LogOutput};
use bollard::exec::{CreateExecOptions, StartExecResults};
use bollard::Docker;
use futures_util::stream::StreamExt;
use tracing::{debug, info, warn};

pub struct DockerMailserver {
    docker: Docker,
    image: String,
}

impl DockerMailserver {
    pub async fn connect(config: &DockerConfig) -> Result<Self, MailserverError> {
        let docker = Self::connect_to_docker(config.host.as_deref())?;

        // Test the connection
        docker.ping().await?;

        info!("Successfully connected to Docker daemon");
        Ok(Self {
            docker,
            image: config.image.clone(),
        })
    }

    fn connect_to_docker(host: Option<&str>) -> Result<Docker, bollard::errors::Error> {
        if let Some(docker_host) = host {
            info!("Using Docker host from config: {}", docker_host);
            std::env::set_var("DOCKER_HOST", docker_host);

            match Docker::connect_with_local_defaults() {
                Ok(docker) => return Ok(docker),
                Err(e) => {
                    warn!("Failed to connect to configured Docker host {}: {}", docker_host, e);
                }
            }
        }

        if let Ok(docker_host) = std::env::var("DOCKER_HOST") {
            info!("Using DOCKER_HOST: {}", docker_host);
            return Docker::connect_with_local_defaults();
        }

        for socket_path in Self::docker_socket_paths() {
            if !std::path::Path::new(&socket_path).exists() {
                continue;
            }

            info!("Found Docker socket at: {}", socket_path);
            std::env::set_var("DOCKER_HOST", format!("unix://{socket_path}"));

            match Docker::connect_with_local_defaults() {
                Ok(docker) => return Ok(docker),
                Err(e) => {
                    warn!("Failed to connect to Docker socket {}: {}", socket_path, e);
                }
            }
        }

        warn!("No Docker socket found, trying default connection");
        Docker::connect_with_local_defaults()
    }

    fn docker_socket_paths() -> Vec<String> {
        let mut paths = Vec::new();

        if cfg!(target_os = "macos") {
            if let Some(home) = dirs::home_dir() {
                let home = home.to_string_lossy();
                paths.push(format!("{home}/.docker/run/docker.sock"));
                paths.push(format!("{home}/.colima/default/docker.sock"));
            }
        }

        if cfg!(target_os = "linux") {
            paths.push("/var/run/docker.sock".to_string());

            // Rootless Docker
            if let Ok(xdg_runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
                paths.push(format!("{xdg_runtime_dir}/docker.sock"));
            }
        }

        paths
    }
}

impl MailserverExec for DockerMailserver {
    async fn find_container(&self) -> Result<Option<String>, MailserverError> {
        let containers = self
            .docker
            .list_containers(Some(ListContainersOptions::<String>::default()))
            .await?;

        let found = containers
            .into_iter()
            .find(|c| c.image.as_deref().is_some_and(|image| image.contains(&self.image)))
            .and_then(|c| c.id);

        match &found {
            Some(id) => debug!("Mailserver container: {}", id),
            None => debug!("No running container with image {}", self.image),
        }
        Ok(found)
    }

    async fn exec(&self, container_id: &str, args: &[&str]) -> Result<String, MailserverError> {
        debug!("Running {:?} in container {}", args, container_id);

        let exec = self
            .docker
            .create_exec(
                container_id,
                CreateExecOptions {
                    cmd: Some(args.iter().map(ToString::to_string).collect::<Vec<_>>()),
                    attach_stdout: Some(true),
                    attach_stderr: Some(true),
                    ..Default::default()
                },
            )
            .await?;

        let mut text = String::new();
        match self.docker.start_exec(&exec.id, None).await? {
            StartExecResults::Attached { mut output, .. } => {
                while let Some(chunk) = output.next().await {
                    match chunk? {
                        LogOutput::StdOut { message } | LogOutput::StdErr { message } => {
                            text.push_str(&String::from_utf8_lossy(&message));
                        }
                        _ => {}
                    }
                }
            }
            StartExecResults::Detached => {
                return Err(MailserverError::Exec(format!(
                    "exec {} detached before producing output",
                    exec.id
                )));
            }
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: These tests require Docker to be running
    // They are integration tests and should be run with `cargo test --ignored`

    #[tokio::test]
    #[ignore]
    async fn test_connect_and_lookup() {
        let mailserver = DockerMailserver::connect(&DockerConfig::default()).await;
        assert!(mailserver.is_ok(), "Should be able to connect to Docker");
        assert!(mailserver.unwrap().find_container().await.is_ok());
    }
}
