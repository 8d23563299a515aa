// ABOUTME: Application configuration loaded from a TOML file with defaults for every field

use crate::app::toast_board::DEFAULT_TOAST_DURATION;
use crate::models::DOCKER_IMAGE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub docker: DockerConfig,
    pub toasts: ToastConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Docker endpoint, e.g. `unix:///var/run/docker.sock`. Falls back to
    /// `DOCKER_HOST` and the usual socket locations when unset.
    pub host: Option<String>,
    /// Image name fragment that identifies the mailserver container.
    pub image: String,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            host: None,
            image: DOCKER_IMAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    pub duration_secs: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_TOAST_DURATION.as_secs(),
        }
    }
}

impl ToastConfig {
    pub const fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

impl AppConfig {
    /// `<config dir>/mailserver-aliases/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mailserver-aliases").join("config.toml"))
    }

    /// Loads the default config file, or defaults when there is none.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.docker.host, None);
        assert_eq!(config.docker.image, "mailserver/docker-mailserver");
        assert_eq!(config.toasts.duration(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[toasts]\nduration_secs = 12\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.toasts.duration_secs, 12);
        assert_eq!(config.docker, DockerConfig::default());
    }

    #[test]
    fn test_full_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[docker]
host = "unix:///run/user/1000/docker.sock"
image = "ghcr.io/docker-mailserver/docker-mailserver"

[toasts]
duration_secs = 3
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(
            config.docker.host.as_deref(),
            Some("unix:///run/user/1000/docker.sock")
        );
        assert_eq!(config.docker.image, "ghcr.io/docker-mailserver/docker-mailserver");
        assert_eq!(config.toasts.duration(), Duration::from_secs(3));
    }

    #[test]
    fn test_missing_and_invalid_files() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            AppConfig::load_from(&missing),
            Err(ConfigError::Io { .. })
        ));

        let invalid = dir.path().join("invalid.toml");
        fs::write(&invalid, "[toasts]\nduration_secs = \"soon\"\n").unwrap();
        assert!(matches!(
            AppConfig::load_from(&invalid),
            Err(ConfigError::Parse { .. })
        ));
    }
}
