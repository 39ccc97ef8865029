//! Host configuration loaded from a TOML file.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}

/// Top-level host configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// Native content root on disk.
    pub root: PathBuf,

    /// Application root of the virtual namespace.
    #[serde(default = "default_app_root")]
    pub app_root: String,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// HTTP serve settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    #[serde(default = "default_interface")]
    pub interface: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Startup view-defaults copy: well-known files seeded from the shared
/// views directory into the areas directory when missing there.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    #[serde(default = "default_views_dir")]
    pub views_dir: String,

    #[serde(default = "default_areas_dir")]
    pub areas_dir: String,

    #[serde(default = "default_files")]
    pub files: Vec<String>,
}

fn default_app_root() -> String {
    "/".to_string()
}

fn default_interface() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    8080
}

fn default_views_dir() -> String {
    "Views".to_string()
}

fn default_areas_dir() -> String {
    "Areas".to_string()
}

fn default_files() -> Vec<String> {
    vec!["_layout.html".to_string(), "_viewstart.html".to_string()]
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: default_interface(),
            port: default_port(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            views_dir: default_views_dir(),
            areas_dir: default_areas_dir(),
            files: default_files(),
        }
    }
}

impl HostConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.root.as_os_str().is_empty() {
            return Err(ConfigError::Validation("root must not be empty".into()));
        }
        if !self.app_root.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "app_root must start with '/', got '{}'",
                self.app_root
            )));
        }
        if self.serve.port == 0 {
            return Err(ConfigError::Validation("serve.port must not be 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(body: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modfs.toml");
        fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn test_minimal_config_gets_defaults() {
        let (_dir, path) = write_config(r#"root = "site""#);
        let config = HostConfig::load(&path).unwrap();
        assert_eq!(config.root, PathBuf::from("site"));
        assert_eq!(config.app_root, "/");
        assert_eq!(config.serve.port, 8080);
        assert_eq!(config.defaults.views_dir, "Views");
        assert_eq!(config.defaults.files.len(), 2);
    }

    #[test]
    fn test_full_config() {
        let (_dir, path) = write_config(
            r#"
            root = "/srv/site"
            app_root = "/app"

            [serve]
            interface = "0.0.0.0"
            port = 9000

            [defaults]
            views_dir = "Shared"
            areas_dir = "Modules"
            files = ["_base.html"]
            "#,
        );
        let config = HostConfig::load(&path).unwrap();
        assert_eq!(config.app_root, "/app");
        assert_eq!(config.serve.port, 9000);
        assert_eq!(config.defaults.files, vec!["_base.html"]);
    }

    #[test]
    fn test_validation_rejects_bad_app_root() {
        let (_dir, path) = write_config(
            r#"
            root = "site"
            app_root = "app"
            "#,
        );
        assert!(matches!(
            HostConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let (_dir, path) = write_config(
            r#"
            root = "site"
            no_such_key = true
            "#,
        );
        assert!(matches!(HostConfig::load(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            HostConfig::load(&dir.path().join("absent.toml")),
            Err(ConfigError::Io(_, _))
        ));
    }
}
