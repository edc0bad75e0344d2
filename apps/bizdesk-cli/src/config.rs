//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line flags (highest priority, applied by the caller)       │
//! │     --prefix ACME  --tax-rate 8.25                                     │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     BIZDESK_INVOICE_PREFIX=ACME                                        │
//! │     BIZDESK_TAX_RATE=8.25                                              │
//! │     BIZDESK_LOG_LEVEL=debug                                            │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/bizdesk/bizdesk.toml (Linux)                             │
//! │     ~/Library/Application Support/com.bizdesk.bizdesk/bizdesk.toml     │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     prefix "INV", no tax, log level "info"                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # bizdesk.toml
//! [invoice]
//! prefix = "INV"
//! default_tax_rate = 8.25   # percent, applied when an invoice carries no tax
//!
//! [logging]
//! level = "info"            # RUST_LOG still wins when set
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use bizdesk_core::DEFAULT_INVOICE_PREFIX;

pub const ENV_INVOICE_PREFIX: &str = "BIZDESK_INVOICE_PREFIX";
pub const ENV_TAX_RATE: &str = "BIZDESK_TAX_RATE";
pub const ENV_LOG_LEVEL: &str = "BIZDESK_LOG_LEVEL";

const CONFIG_FILE_NAME: &str = "bizdesk.toml";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Invoice numbering and default tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSettings {
    /// Prefix of generated invoice numbers.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Tax rate in percent used when an invoice arrives without a tax amount.
    #[serde(default)]
    pub default_tax_rate: f64,
}

fn default_prefix() -> String {
    DEFAULT_INVOICE_PREFIX.to_string()
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        InvoiceSettings {
            prefix: default_prefix(),
            default_tax_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: default_level(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BizdeskConfig {
    #[serde(default)]
    pub invoice: InvoiceSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl BizdeskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`bizdesk.toml`)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` that does not exist is an error; a missing
    /// file at the default location is not.
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parses one TOML file. Missing sections and keys take their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let prefix = &self.invoice.prefix;
        if prefix.is_empty() {
            return Err(ConfigError::Invalid("invoice.prefix must not be empty".into()));
        }
        if !prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::Invalid(format!(
                "invoice.prefix may only contain letters, digits, '-' and '_', got: '{}'",
                prefix
            )));
        }

        let rate = self.invoice.default_tax_rate;
        if !rate.is_finite() || !(0.0..=100.0).contains(&rate) {
            return Err(ConfigError::Invalid(format!(
                "invoice.default_tax_rate must be between 0 and 100, got: {}",
                rate
            )));
        }

        Ok(())
    }

    /// Applies `BIZDESK_*` environment variable overrides.
    ///
    /// A tax rate that is not a number is an error, not a silent fallback.
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(prefix) = lookup(ENV_INVOICE_PREFIX) {
            debug!(prefix = %prefix, "Overriding invoice prefix from environment");
            self.invoice.prefix = prefix;
        }

        if let Some(rate) = lookup(ENV_TAX_RATE) {
            let parsed = rate.trim().parse::<f64>().map_err(|_| {
                warn!(rate = %rate, "Unparseable tax rate in environment");
                ConfigError::Invalid(format!("{} must be a number, got: '{}'", ENV_TAX_RATE, rate))
            })?;
            debug!(rate = parsed, "Overriding default tax rate from environment");
            self.invoice.default_tax_rate = parsed;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bizdesk", "bizdesk")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
