use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT, SQLITE_DB_FILENAME,
};

// =============================================================================
// Transactional Backend Enum (SQLite or in-memory)
// =============================================================================

/// Transactional database backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionalBackend {
    #[default]
    Sqlite,
    Memory,
}

impl fmt::Display for TransactionalBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionalBackend::Sqlite => write!(f, "sqlite"),
            TransactionalBackend::Memory => write!(f, "memory"),
        }
    }
}

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Authentication configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthFileConfig {
    pub enabled: Option<bool>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub jwks_url: Option<String>,
}

/// Database configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    pub transactional: Option<TransactionalBackend>,
    pub path: Option<String>,
}

/// CORS configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CorsFileConfig {
    pub allowed_origins: Option<Vec<String>>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub auth: Option<AuthFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub cors: Option<CorsFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                current.host = server.host;
            }
            if server.port.is_some() {
                current.port = server.port;
            }
        }

        if let Some(auth) = other.auth {
            let current = self.auth.get_or_insert_with(AuthFileConfig::default);
            if auth.enabled.is_some() {
                current.enabled = auth.enabled;
            }
            if auth.issuer.is_some() {
                current.issuer = auth.issuer;
            }
            if auth.audience.is_some() {
                current.audience = auth.audience;
            }
            if auth.jwks_url.is_some() {
                current.jwks_url = auth.jwks_url;
            }
        }

        if let Some(database) = other.database {
            let current = self.database.get_or_insert_with(DatabaseFileConfig::default);
            if database.transactional.is_some() {
                current.transactional = database.transactional;
            }
            if database.path.is_some() {
                current.path = database.path;
            }
        }

        if let Some(cors) = other.cors {
            let current = self.cors.get_or_insert_with(CorsFileConfig::default);
            if cors.allowed_origins.is_some() {
                current.allowed_origins = cors.allowed_origins;
            }
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub enabled: bool,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub jwks_url: Option<String>,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub transactional: TransactionalBackend,
    /// SQLite database file path
    pub path: PathBuf,
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.playdeck/playdeck.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.playdeck/playdeck.json) - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        // 3. Extract file config values with defaults
        let file_server = file_config.server.unwrap_or_default();
        let file_auth = file_config.auth.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_cors = file_config.cors.unwrap_or_default();

        // 4. Layer configs: defaults -> file config -> CLI/env overrides
        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        // auth.enabled: file config sets default, --no-auth CLI flag disables
        let auth_enabled = if cli.no_auth {
            false
        } else {
            file_auth.enabled.unwrap_or(true)
        };

        let auth = AuthConfig {
            enabled: auth_enabled,
            issuer: cli.auth_issuer.clone().or(file_auth.issuer),
            audience: cli.auth_audience.clone().or(file_auth.audience),
            jwks_url: cli.auth_jwks_url.clone().or(file_auth.jwks_url),
        };

        let transactional = cli
            .transactional_backend
            .or(file_database.transactional)
            .unwrap_or_default();

        let db_path = match (&cli.data_dir, file_database.path) {
            (Some(dir), _) => expand_path(&dir.to_string_lossy()).join(SQLITE_DB_FILENAME),
            (None, Some(path)) => expand_path(&path),
            (None, None) => default_data_dir().join(SQLITE_DB_FILENAME),
        };

        let config = Self {
            server: ServerConfig { host, port },
            auth,
            database: DatabaseConfig {
                transactional,
                path: db_path,
            },
            cors: CorsConfig {
                allowed_origins: file_cors.allowed_origins.unwrap_or_default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        // Security warning: auth disabled while binding to all interfaces
        if !self.auth.enabled && is_all_interfaces(&self.server.host) {
            tracing::warn!(
                host = %self.server.host,
                "Authentication is disabled while binding to all network interfaces. \
                 This exposes an unauthenticated server to your network."
            );
        }

        if self.auth.enabled
            && (self.auth.issuer.is_none()
                || self.auth.audience.is_none()
                || self.auth.jwks_url.is_none())
        {
            anyhow::bail!(
                "Configuration error: auth.issuer, auth.audience, and auth.jwks_url are \
                 required when auth is enabled. Use --no-auth for local development."
            );
        }

        Ok(())
    }
}

/// Get the profile config path (~/.playdeck/playdeck.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Default data directory (~/.playdeck)
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(APP_DOT_FOLDER))
        .unwrap_or_else(|| PathBuf::from(APP_DOT_FOLDER))
}

/// Check if host binds to all network interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transactional_backend_serde() {
        let backend: TransactionalBackend = serde_json::from_str(r#""sqlite""#).unwrap();
        assert_eq!(backend, TransactionalBackend::Sqlite);
        let backend: TransactionalBackend = serde_json::from_str(r#""memory""#).unwrap();
        assert_eq!(backend, TransactionalBackend::Memory);
    }

    #[test]
    fn test_transactional_backend_display() {
        assert_eq!(TransactionalBackend::Sqlite.to_string(), "sqlite");
        assert_eq!(TransactionalBackend::Memory.to_string(), "memory");
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(is_all_interfaces("[::]"));
        assert!(!is_all_interfaces("127.0.0.1"));
        assert!(!is_all_interfaces("localhost"));
        assert!(!is_all_interfaces("::1"));
    }

    #[test]
    fn test_file_config_parse() {
        let json = r#"{
            "server": { "host": "0.0.0.0", "port": 8080 },
            "auth": { "enabled": false },
            "database": { "transactional": "memory" }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.server.as_ref().unwrap().host,
            Some("0.0.0.0".to_string())
        );
        assert_eq!(config.auth.as_ref().unwrap().enabled, Some(false));
        assert_eq!(
            config.database.as_ref().unwrap().transactional,
            Some(TransactionalBackend::Memory)
        );
    }

    #[test]
    fn test_file_config_merge_overlay_wins() {
        let mut base: FileConfig = serde_json::from_str(
            r#"{ "server": { "host": "127.0.0.1", "port": 5460 } }"#,
        )
        .unwrap();
        let overlay: FileConfig =
            serde_json::from_str(r#"{ "server": { "port": 9000 } }"#).unwrap();

        base.merge(overlay);
        let server = base.server.unwrap();
        assert_eq!(server.host, Some("127.0.0.1".to_string()));
        assert_eq!(server.port, Some(9000));
    }

    #[test]
    fn test_validate_requires_auth_settings() {
        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5460,
            },
            auth: AuthConfig {
                enabled: true,
                issuer: None,
                audience: None,
                jwks_url: None,
            },
            database: DatabaseConfig {
                transactional: TransactionalBackend::Memory,
                path: PathBuf::new(),
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
            },
        };
        assert!(config.validate().is_err());
    }
}
