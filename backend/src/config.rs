//! # Backend Configuration
//!
//! Settings come from a YAML file when `SHOWTRACK_CONFIG` names one, otherwise
//! from `SHOWTRACK_*` environment variables. Everything has a default except
//! the remote store's URL and key.
//!
//! ```yaml
//! bind_address: 127.0.0.1:3000
//! log_level: debug
//! store:
//!   kind: remote
//!   url: https://example.supabase.co
//!   api_key: anon-key
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_ENV: &str = "SHOWTRACK_CONFIG";
pub const STORE_ENV: &str = "SHOWTRACK_STORE";
pub const STORE_URL_ENV: &str = "SHOWTRACK_STORE_URL";
pub const STORE_KEY_ENV: &str = "SHOWTRACK_STORE_KEY";
pub const SQLITE_PATH_ENV: &str = "SHOWTRACK_SQLITE_PATH";
pub const BIND_ENV: &str = "SHOWTRACK_BIND";
pub const LOG_ENV: &str = "SHOWTRACK_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Where rows and attachments are kept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreSettings {
    #[default]
    Memory,
    Sqlite {
        #[serde(default = "default_sqlite_path")]
        path: PathBuf,
    },
    Remote {
        url: String,
        api_key: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl StoreSettings {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreSettings::Memory => "memory",
            StoreSettings::Sqlite { .. } => "sqlite",
            StoreSettings::Remote { .. } => "remote",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub store: StoreSettings,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            log_level: default_log_level(),
            store: StoreSettings::default(),
        }
    }
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// `<data dir>/ShowTrackAI/showtrack.db`, or the working directory when the
/// platform has no data directory
pub fn default_sqlite_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ShowTrackAI")
        .join("showtrack.db")
}

impl BackendConfig {
    /// Load from the file named by `SHOWTRACK_CONFIG`, else the environment
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_yaml_file(Path::new(&path)),
            Err(_) => Self::from_env(),
        }
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup, so tests need not touch the process env
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = BackendConfig::default();

        if let Some(bind) = lookup(BIND_ENV) {
            config.bind_address = bind.parse().map_err(|_| ConfigError::Invalid {
                key: BIND_ENV,
                value: bind,
            })?;
        }
        if let Some(level) = lookup(LOG_ENV) {
            config.log_level = level;
        }

        config.store = match lookup(STORE_ENV).as_deref().unwrap_or("memory") {
            "memory" => StoreSettings::Memory,
            "sqlite" => StoreSettings::Sqlite {
                path: lookup(SQLITE_PATH_ENV)
                    .map(PathBuf::from)
                    .unwrap_or_else(default_sqlite_path),
            },
            "remote" => StoreSettings::Remote {
                url: lookup(STORE_URL_ENV).ok_or(ConfigError::Missing(STORE_URL_ENV))?,
                api_key: lookup(STORE_KEY_ENV).ok_or(ConfigError::Missing(STORE_KEY_ENV))?,
                timeout_secs: default_timeout_secs(),
            },
            other => {
                return Err(ConfigError::Invalid {
                    key: STORE_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = BackendConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, BackendConfig::default());
        assert_eq!(config.store, StoreSettings::Memory);
        assert_eq!(config.bind_address.port(), 3000);
    }

    #[test]
    fn test_remote_from_env() {
        let config = BackendConfig::from_lookup(lookup(&[
            (STORE_ENV, "remote"),
            (STORE_URL_ENV, "https://db.example.com"),
            (STORE_KEY_ENV, "anon"),
            (BIND_ENV, "0.0.0.0:8080"),
            (LOG_ENV, "debug"),
        ]))
        .unwrap();

        assert_eq!(
            config.store,
            StoreSettings::Remote {
                url: "https://db.example.com".to_string(),
                api_key: "anon".to_string(),
                timeout_secs: 30,
            }
        );
        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_remote_requires_url_and_key() {
        let err = BackendConfig::from_lookup(lookup(&[(STORE_ENV, "remote")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(STORE_URL_ENV)));

        let err = BackendConfig::from_lookup(lookup(&[
            (STORE_ENV, "remote"),
            (STORE_URL_ENV, "https://db.example.com"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(STORE_KEY_ENV)));
    }

    #[test]
    fn test_rejects_unknown_store_and_bad_bind() {
        assert!(matches!(
            BackendConfig::from_lookup(lookup(&[(STORE_ENV, "postgres")])),
            Err(ConfigError::Invalid { key: STORE_ENV, .. })
        ));
        assert!(matches!(
            BackendConfig::from_lookup(lookup(&[(BIND_ENV, "nowhere")])),
            Err(ConfigError::Invalid { key: BIND_ENV, .. })
        ));
    }

    #[test]
    fn test_sqlite_path_from_env() {
        let config = BackendConfig::from_lookup(lookup(&[
            (STORE_ENV, "sqlite"),
            (SQLITE_PATH_ENV, "/tmp/show.db"),
        ]))
        .unwrap();
        assert_eq!(
            config.store,
            StoreSettings::Sqlite {
                path: PathBuf::from("/tmp/show.db")
            }
        );
    }

    #[test]
    fn test_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("showtrack.yaml");
        std::fs::write(
            &path,
            "log_level: warn\nstore:\n  kind: sqlite\n  path: /data/show.db\n",
        )
        .unwrap();

        let config = BackendConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.bind_address.port(), 3000);
        assert_eq!(
            config.store,
            StoreSettings::Sqlite {
                path: PathBuf::from("/data/show.db")
            }
        );

        let missing = BackendConfig::from_yaml_file(&dir.path().join("nope.yaml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_yaml_remote_defaults_timeout() {
        let config = BackendConfig::from_yaml_str(
            "store:\n  kind: remote\n  url: https://db.example.com\n  api_key: k\n",
        )
        .unwrap();
        assert!(matches!(
            config.store,
            StoreSettings::Remote {
                timeout_secs: 30,
                ..
            }
        ));
    }
}
