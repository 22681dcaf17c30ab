//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum accepted size of an uploaded import file, in bytes.
    #[serde(default = "default_max_import_bytes")]
    pub max_import_bytes: usize,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_import_bytes() -> usize {
    10 * 1024 * 1024 // 10 MiB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_import_bytes: default_max_import_bytes(),
        }
    }
}

/// Entity store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// SQLite database (recommended for testing and small deployments).
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
    /// PostgreSQL database.
    Postgres {
        /// Connection URL (optional if using individual fields).
        /// Takes precedence over individual fields if both are provided.
        url: Option<String>,
        /// Database host.
        host: Option<String>,
        /// Database port (default: 5432).
        #[serde(default = "default_pg_port")]
        port: Option<u16>,
        /// Database username.
        username: Option<String>,
        /// Database password.
        /// WARNING: prefer the STOCKROOM_STORE__PASSWORD env var over
        /// storing this in a config file.
        password: Option<String>,
        /// Database name.
        database: Option<String>,
        /// Maximum connections in the pool.
        #[serde(default = "default_max_connections")]
        max_connections: u32,
        /// Statement timeout in milliseconds (prevents hung queries).
        statement_timeout_ms: Option<u64>,
    },
}

fn default_pg_port() -> Option<u16> {
    Some(5432)
}

fn default_max_connections() -> u32 {
    10
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/stockroom.db"),
        }
    }
}

impl StoreConfig {
    /// Validate store configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            StoreConfig::Sqlite { .. } => Ok(()),
            StoreConfig::Postgres {
                url,
                host,
                database,
                ..
            } => match (url.as_ref(), host.as_ref(), database.as_ref()) {
                (Some(_), _, _) => Ok(()),
                (None, Some(_), Some(_)) => Ok(()),
                (None, None, _) => Err(
                    "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                ),
                (None, Some(_), None) => Err(
                    "postgres config requires 'database' when using individual fields".to_string(),
                ),
            },
        }
    }
}

/// Top-level application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Entity store configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses a SQLite store at the default path;
    /// tests normally override `store` with a tempdir-backed path.
    pub fn for_testing() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.max_import_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn store_config_defaults_to_sqlite() {
        match StoreConfig::default() {
            StoreConfig::Sqlite { path } => {
                assert_eq!(path, PathBuf::from("./data/stockroom.db"));
            }
            other => panic!("expected sqlite default, got {other:?}"),
        }
    }

    #[test]
    fn postgres_requires_url_or_host_and_database() {
        let config = StoreConfig::Postgres {
            url: None,
            host: None,
            port: default_pg_port(),
            username: None,
            password: None,
            database: None,
            max_connections: 10,
            statement_timeout_ms: None,
        };
        assert!(config.validate().is_err());

        let config = StoreConfig::Postgres {
            url: None,
            host: Some("localhost".to_string()),
            port: default_pg_port(),
            username: None,
            password: None,
            database: Some("stockroom".to_string()),
            max_connections: 10,
            statement_timeout_ms: None,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn store_config_deserializes_from_tagged_toml_shape() {
        let json = r#"{"type": "sqlite", "path": "/tmp/x.db"}"#;
        let config: StoreConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(config, StoreConfig::Sqlite { .. }));
    }
}
