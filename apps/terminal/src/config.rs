//! # Terminal Configuration
//!
//! Which merchant this register serves and where it keeps its state.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TILL_MERCHANT_ID=merchant-42                                       │
//! │     TILL_CURRENCY=NZD                                                  │
//! │     TILL_STORAGE=memory                                                │
//! │     TILL_DB_PATH=/var/lib/till/till.db                                 │
//! │     TILL_LOG=debug                                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/till-pos/terminal.toml (Linux)                           │
//! │     ~/Library/Application Support/com.till.pos/terminal.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [merchant]
//! id = "merchant-42"
//!
//! [currency]
//! default_code = "AUD"
//!
//! [storage]
//! backend = "sqlite"    # sqlite | memory
//! database_path = "/var/lib/till/till.db"
//!
//! [logging]
//! filter = "info,till=debug,sqlx=warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use till_core::validation::{validate_currency_code, validate_merchant_id};
use till_core::DEFAULT_CURRENCY;

use crate::error::{ConfigError, ConfigResult};
use crate::telemetry::DEFAULT_LOG_FILTER;

const CONFIG_FILE_NAME: &str = "terminal.toml";
const DATABASE_FILE_NAME: &str = "till.db";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "till", "pos")
}

// =============================================================================
// Sections
// =============================================================================

/// Which merchant's parked sales and register this terminal uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantSettings {
    #[serde(default = "default_merchant_id")]
    pub id: String,
}

fn default_merchant_id() -> String {
    "default-merchant".to_string()
}

impl Default for MerchantSettings {
    fn default() -> Self {
        MerchantSettings {
            id: default_merchant_id(),
        }
    }
}

/// Currency for empty carts and new register sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySettings {
    #[serde(default = "default_currency_code")]
    pub default_code: String,
}

fn default_currency_code() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            default_code: default_currency_code(),
        }
    }
}

/// Where persisted state lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// SQLite file in the platform data directory.
    #[default]
    Sqlite,

    /// Process memory only; nothing survives a restart.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "file" => Ok(StorageBackend::Sqlite),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::Invalid(format!(
                "Unknown storage backend: '{other}'. Valid options: sqlite, memory"
            ))),
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Database file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

/// Log filter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Terminal Configuration
// =============================================================================

/// Complete terminal configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalConfig {
    #[serde(default)]
    pub merchant: MerchantSettings,

    #[serde(default)]
    pub currency: CurrencySettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl TerminalConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (terminal.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading terminal config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load terminal config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document; missing sections take their defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Terminal config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_merchant_id(&self.merchant.id).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        validate_currency_code(&self.currency.default_code)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid("logging filter must not be empty".into()));
        }

        Ok(())
    }

    /// Applies `TILL_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from any variable source.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(id) = var("TILL_MERCHANT_ID") {
            debug!(merchant_id = %id, "Overriding merchant ID from environment");
            self.merchant.id = id;
        }

        if let Some(code) = var("TILL_CURRENCY") {
            debug!(currency = %code, "Overriding currency from environment");
            self.currency.default_code = code.trim().to_ascii_uppercase();
        }

        if let Some(backend) = var("TILL_STORAGE") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %backend, "Overriding storage backend from environment");
                    self.storage.backend = parsed;
                }
                Err(_) => warn!(backend = %backend, "Unknown storage backend in environment"),
            }
        }

        if let Some(path) = var("TILL_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(filter) = var("TILL_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn merchant_id(&self) -> &str {
        &self.merchant.id
    }

    pub fn currency_code(&self) -> &str {
        &self.currency.default_code
    }

    /// The configured database file, else `till.db` in the platform data
    /// directory, else `till.db` in the working directory.
    pub fn database_path(&self) -> PathBuf {
        self.storage.database_path.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
                .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
