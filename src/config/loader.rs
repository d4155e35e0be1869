//! Configuration loading and merging logic
//!
//! Precedence order (highest to lowest): environment variable overrides,
//! config file, built-in defaults. A broken config file is reported and
//! ignored rather than taking the command down.

use std::path::{Path, PathBuf};
use thiserror::Error;

use super::paths;
use super::schema::Config;

/// Errors from reading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    pub fn load() -> Config {
        let mut config = match Self::load_file(&paths::config_file()) {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                tracing::warn!("Ignoring invalid config file: {}", e);
                Config::default()
            }
        };
        Self::apply_env_overrides(&mut config);
        config
    }

    /// Parse one config file; Ok(None) when it does not exist
    pub fn load_file(path: &Path) -> Result<Option<Config>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(config))
    }

    pub(crate) fn apply_env_overrides(config: &mut Config) {
        if let Ok(namespace) = std::env::var("DEVGRAPH_NAMESPACE") {
            if !namespace.is_empty() {
                config.default_namespace = namespace;
            }
        }
        if let Ok(direction) = std::env::var("DEVGRAPH_LAYOUT_DIRECTION") {
            match direction.parse() {
                Ok(direction) => config.layout.direction = direction,
                Err(e) => tracing::warn!("Ignoring DEVGRAPH_LAYOUT_DIRECTION: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_file_missing_is_none() {
        let loaded = ConfigLoader::load_file(Path::new("/nonexistent/devgraph.yaml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_file_parses_yaml() {
        let path =
            std::env::temp_dir().join(format!("devgraph-config-{}.yaml", std::process::id()));
        std::fs::write(&path, "defaultNamespace: ns-7\n").unwrap();
        let config = ConfigLoader::load_file(&path).unwrap().unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.default_namespace, "ns-7");
    }

    #[test]
    fn test_load_file_rejects_bad_yaml() {
        let path = std::env::temp_dir().join(format!("devgraph-bad-{}.yaml", std::process::id()));
        std::fs::write(&path, "defaultNamespace: [unclosed").unwrap();
        let err = ConfigLoader::load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
