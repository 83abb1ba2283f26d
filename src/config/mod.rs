//! Application configuration
//!
//! Settings are layered, lowest precedence first: built-in defaults, an
//! optional TOML file, `SUPPORTLAB_*` environment variables, the `SECRET_KEY`
//! and `DATABASE_PATH` variables, and finally CLI flags applied through
//! [`ConfigOverrides`].

use crate::error::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Signing key used when none is configured; unsafe outside development
pub const INSECURE_SECRET_KEY: &str = "dev-key-insecure";

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "supportlab.toml";

/// Which ticket store backs the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

/// Resolved application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Key signing the flash-message cookie
    pub secret_key: String,
    /// SQLite database file
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    /// Directory whose `*.html` files override the built-in templates
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
    /// Directory served under `/static`
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            secret_key: INSECURE_SECRET_KEY.to_string(),
            database_path: PathBuf::from("supportlab.db"),
            host: "127.0.0.1".to_string(),
            port: 5000,
            storage: StorageBackend::Sqlite,
            templates_dir: None,
            static_dir: None,
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub memory: bool,
}

impl AppConfig {
    /// Load configuration from defaults, `path` (or `supportlab.toml` when
    /// present) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("secret_key", defaults.secret_key)?
            .set_default("database_path", defaults.database_path.to_string_lossy().into_owned())?
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("storage", "sqlite")?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings = builder
            .add_source(Environment::with_prefix("SUPPORTLAB").try_parsing(true))
            .set_override_option("secret_key", std::env::var("SECRET_KEY").ok())?
            .set_override_option("database_path", std::env::var("DATABASE_PATH").ok())?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Apply command-line values on top of the loaded settings
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(path) = overrides.database_path {
            self.database_path = path;
        }
        if overrides.memory {
            self.storage = StorageBackend::Memory;
        }
        self
    }

    /// Whether the signing key is still the built-in default
    pub fn uses_insecure_secret(&self) -> bool {
        self.secret_key == INSECURE_SECRET_KEY
    }

    /// Log a warning when the signing key was left at its default
    pub fn warn_if_insecure(&self) {
        if self.uses_insecure_secret() {
            tracing::warn!(
                "Using default insecure secret key. Set SECRET_KEY (or secret_key in {}) for production.",
                DEFAULT_CONFIG_FILE
            );
        }
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|e| {
            crate::error::SupportLabError::custom(format!("Invalid bind address '{addr}': {e}"))
        })
    }
}
