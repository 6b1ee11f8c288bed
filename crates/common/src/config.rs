//! Application configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Authentication/role-check configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Evidence image storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// AI advisory configuration.
    #[serde(default)]
    pub advisory: AdvisoryConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Authentication and role-resolution configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Upper bound on a single admin-role lookup before the check
    /// degrades to unprivileged.
    #[serde(default = "default_role_check_timeout_secs")]
    pub role_check_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            role_check_timeout_secs: default_role_check_timeout_secs(),
        }
    }
}

/// Evidence image storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Base directory for stored files.
    #[serde(default = "default_storage_path")]
    pub base_path: PathBuf,
    /// Base URL for serving files.
    #[serde(default = "default_storage_url")]
    pub base_url: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            base_path: default_storage_path(),
            base_url: default_storage_url(),
        }
    }
}

/// AI advisory (category suggestion / image analysis) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisoryConfig {
    /// Generative API base URL.
    #[serde(default = "default_advisory_api_base")]
    pub api_base: String,
    /// API key; advisory features degrade to "no suggestion" without one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name.
    #[serde(default = "default_advisory_model")]
    pub model: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_advisory_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional local analysis webhook (`POST /analyze {image_url}`).
    #[serde(default)]
    pub analyze_webhook_url: Option<String>,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            api_base: default_advisory_api_base(),
            api_key: None,
            model: default_advisory_model(),
            timeout_secs: default_advisory_timeout_secs(),
            analyze_webhook_url: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_role_check_timeout_secs() -> u64 {
    3
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./files")
}

fn default_storage_url() -> String {
    "/files".to_string()
}

fn default_advisory_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_advisory_model() -> String {
    "gemini-1.5-flash".to_string()
}

const fn default_advisory_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `ECHOCITY_ENV`)
    /// 3. Environment variables with `ECHOCITY_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("ECHOCITY_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ECHOCITY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("ECHOCITY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
