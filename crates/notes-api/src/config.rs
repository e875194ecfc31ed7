//! # Service Configuration
//!
//! [`AppConfig`] is read once at startup from a YAML file, then overridden
//! from environment variables, then validated. It is immutable afterwards
//! and handed to the components that need it; nothing reads the
//! environment after [`AppConfig::load`] returns.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults.
//! 2. YAML file at `$NOTES_CONFIG` (default `config/config.yaml`). A
//!    missing file is not an error.
//! 3. Environment variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `PORT` | `application.port` |
//! | `JWT_KEY` | `application.jwt_key` |
//! | `TOKEN_TTL_SECS` | `application.token_ttl_secs` |
//! | `PASSWORD_COST` | `application.password_cost` |
//! | `DATABASE_URL` | `database.url` |
//! | `QUOTE_ENRICHMENT` | `enrichment.enabled` |
//! | `QUOTE_URL` | `enrichment.url` |
//! | `QUOTE_TIMEOUT_MS` | `enrichment.timeout_ms` |
//! | `LOG_JSON` | `log.json` |

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// Config file used when `NOTES_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// Signing keys shorter than this are accepted with a warning.
const RECOMMENDED_KEY_BYTES: usize = 32;

/// Errors while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`AppConfig`].
    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    /// No signing key was configured.
    #[error("application.jwt_key (JWT_KEY) must be set to a non-empty value")]
    MissingSigningKey,

    /// Token lifetime of zero.
    #[error("application.token_ttl_secs must be greater than zero")]
    InvalidTtl,

    /// bcrypt cost outside 4..=31.
    #[error("application.password_cost must be in 4..=31, got {0}")]
    InvalidCost(u32),

    /// Enrichment URL does not parse.
    #[error("enrichment.url {url:?} is not a valid URL: {reason}")]
    InvalidUrl { url: String, reason: String },
}

// ── Sections ────────────────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub application: ApplicationConfig,
    pub database: DatabaseConfig,
    pub enrichment: EnrichmentConfig,
    pub log: LogConfig,
    /// File the values were read from; `None` when it was absent.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// HTTP listener and credential settings.
///
/// Custom `Debug` redacts the signing key.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub port: u16,
    pub jwt_key: String,
    pub token_ttl_secs: u64,
    pub password_cost: u32,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            jwt_key: String::new(),
            token_ttl_secs: 86_400,
            password_cost: notes_crypto::DEFAULT_COST,
        }
    }
}

impl std::fmt::Debug for ApplicationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationConfig")
            .field("port", &self.port)
            .field("jwt_key", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("password_cost", &self.password_cost)
            .finish()
    }
}

impl ApplicationConfig {
    /// Token lifetime as a `Duration`.
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// Whether the signing key is shorter than the recommended 32 bytes.
    pub fn has_short_signing_key(&self) -> bool {
        self.jwt_key.len() < RECOMMENDED_KEY_BYTES
    }
}

/// Postgres connection settings.
///
/// Either `url` or the discrete fields may be given; `url` wins. With
/// neither, the service runs on the in-memory store. Custom `Debug`
/// redacts the password and the URL (which may embed it).
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("name", &self.name)
            .finish()
    }
}

impl DatabaseConfig {
    /// The Postgres connection URL, if a database is configured.
    pub fn connection_url(&self) -> Option<String> {
        if let Some(url) = self.url.as_ref().filter(|u| !u.is_empty()) {
            return Some(url.clone());
        }
        let host = self.host.as_ref()?;
        let name = self.name.as_ref()?;
        let port = self.port.unwrap_or(5432);
        let credentials = match (&self.user, &self.password) {
            (Some(user), Some(password)) => format!("{user}:{password}@"),
            (Some(user), None) => format!("{user}@"),
            _ => String::new(),
        };
        Some(format!("postgres://{credentials}{host}:{port}/{name}"))
    }
}

/// Quote-of-the-day enrichment for new notes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub enabled: bool,
    pub url: String,
    pub timeout_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "https://favqs.com/api/qotd".to_string(),
            timeout_ms: 2_000,
        }
    }
}

impl EnrichmentConfig {
    /// Upper bound on one enrichment call.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Log output format.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub json: bool,
}

// ── Loading ─────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load from `$NOTES_CONFIG` (or the default path) and the process
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("NOTES_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_with(Path::new(&path), |key| std::env::var(key).ok())
    }

    /// Load from `path`, taking overrides from `env` instead of the process
    /// environment.
    pub fn load_with(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML config file. A missing or empty file yields defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        let mut config = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str::<Self>(&contents).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?
        };
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = env("PORT") {
            self.application.port = parse_var("PORT", &v)?;
        }
        if let Some(v) = env("JWT_KEY") {
            self.application.jwt_key = v;
        }
        if let Some(v) = env("TOKEN_TTL_SECS") {
            self.application.token_ttl_secs = parse_var("TOKEN_TTL_SECS", &v)?;
        }
        if let Some(v) = env("PASSWORD_COST") {
            self.application.password_cost = parse_var("PASSWORD_COST", &v)?;
        }
        if let Some(v) = env("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Some(v) = env("QUOTE_ENRICHMENT") {
            self.enrichment.enabled = parse_var("QUOTE_ENRICHMENT", &v)?;
        }
        if let Some(v) = env("QUOTE_URL") {
            self.enrichment.url = v;
        }
        if let Some(v) = env("QUOTE_TIMEOUT_MS") {
            self.enrichment.timeout_ms = parse_var("QUOTE_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = env("LOG_JSON") {
            self.log.json = parse_var("LOG_JSON", &v)?;
        }
        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let app = &self.application;
        if app.jwt_key.is_empty() {
            return Err(ConfigError::MissingSigningKey);
        }
        if app.token_ttl_secs == 0 {
            return Err(ConfigError::InvalidTtl);
        }
        if !(4..=31).contains(&app.password_cost) {
            return Err(ConfigError::InvalidCost(app.password_cost));
        }
        url::Url::parse(&self.enrichment.url).map_err(|e| ConfigError::InvalidUrl {
            url: self.enrichment.url.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
