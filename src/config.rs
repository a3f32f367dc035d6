//! # Configuration
//!
//! Application configuration loading and management.
//!
//! Configuration is loaded in the following order (later sources override
//! earlier):
//! 1. Default values
//! 2. Configuration file (if exists)
//! 3. Environment variables (prefixed with `PFI_EXCHANGE_`)
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `PFI_EXCHANGE_CONFIG_FILE` | Path to the TOML config file | `config.toml` |
//! | `PFI_EXCHANGE_GATEWAY_URL` | Counterparty gateway base URL | `http://localhost:9000` |
//! | `PFI_EXCHANGE_GATEWAY_TIMEOUT_MS` | Gateway request timeout | `10000` |
//! | `PFI_EXCHANGE_POLL_INTERVAL_SECS` | Seconds between reconciliation sweeps | `80` |
//! | `PFI_EXCHANGE_SIGNING_KEY` | HMAC signing key material (read at startup) | none |
//! | `PFI_EXCHANGE_LOG_LEVEL` | Log level | `info` |
//! | `PFI_EXCHANGE_LOG_FORMAT` | Log format (json/pretty) | `json` |
//!
//! # Examples
//!
//! ```ignore
//! use pfi_exchange::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! println!("gateway: {}", config.gateway.base_url);
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::services::retry::RetryPolicy;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse configuration.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Invalid configuration value.
    #[error("invalid config value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Environment variable error.
    #[error("environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

// ============================================================================
// Service Configuration
// ============================================================================

/// Service identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name for tracing.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Environment (development, staging, production).
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            environment: default_environment(),
        }
    }
}

// ============================================================================
// Gateway Configuration
// ============================================================================

/// Counterparty gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL used for counterparties without an explicit endpoint.
    #[serde(default = "default_gateway_url")]
    pub base_url: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_gateway_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Per-counterparty base URL overrides, keyed by PFI id.
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_gateway_url(),
            request_timeout_ms: default_gateway_timeout_ms(),
            endpoints: HashMap::new(),
        }
    }
}

// ============================================================================
// Reconciler Configuration
// ============================================================================

/// Reconciliation polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Seconds between reconciliation sweeps.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Upper bound on concurrent history fetches within one sweep.
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
        }
    }
}

// ============================================================================
// Submission Configuration
// ============================================================================

/// Submission pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Number of worker lanes.
    #[serde(default = "default_submission_lanes")]
    pub lanes: usize,

    /// Queued task capacity per lane.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            lanes: default_submission_lanes(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

// ============================================================================
// Retry Configuration
// ============================================================================

/// Named retry profiles for message submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RetryProfile {
    /// Balanced defaults: 3 retries, 100ms initial delay.
    #[default]
    Standard,
    /// More attempts with shorter delays.
    Aggressive,
    /// Fewer attempts with longer delays.
    Conservative,
    /// Single attempt, no retries.
    None,
}

/// Retry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Which retry profile submissions use.
    #[serde(default)]
    pub profile: RetryProfile,
}

impl RetryConfig {
    /// Builds the retry policy for the configured profile.
    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        match self.profile {
            RetryProfile::Standard => RetryPolicy::default(),
            RetryProfile::Aggressive => RetryPolicy::aggressive(),
            RetryProfile::Conservative => RetryPolicy::conservative(),
            RetryProfile::None => RetryPolicy::no_retry(),
        }
    }
}

// ============================================================================
// Identity Configuration
// ============================================================================

/// Local wallet identity configuration.
///
/// Key material itself never goes in the file; it is read from
/// `PFI_EXCHANGE_SIGNING_KEY` at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Subject (customer id) the wallet signs as.
    #[serde(default = "default_identity_subject")]
    pub subject: String,

    /// Key identifier sent alongside signatures.
    #[serde(default = "default_identity_key_id")]
    pub key_id: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            subject: default_identity_subject(),
            key_id: default_identity_key_id(),
        }
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (structured logging).
    #[default]
    Json,
    /// Pretty format (human-readable).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include target (module path) in logs.
    #[serde(default = "default_true")]
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Json,
            include_target: true,
        }
    }
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Service identity configuration.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Counterparty gateway configuration.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Reconciliation polling configuration.
    #[serde(default)]
    pub reconciler: ReconcilerConfig,

    /// Submission pool configuration.
    #[serde(default)]
    pub submission: SubmissionConfig,

    /// Retry configuration.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Local identity configuration.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// Loads configuration from environment variables and optional config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured file exists but cannot be read or
    /// parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let config_path = std::env::var("PFI_EXCHANGE_CONFIG_FILE")
            .unwrap_or_else(|_| "config.toml".to_string());

        if Path::new(&config_path).exists() {
            config = Self::from_file(&config_path)?;
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("PFI_EXCHANGE_GATEWAY_URL") {
            self.gateway.base_url = url;
        }
        if let Ok(timeout) = std::env::var("PFI_EXCHANGE_GATEWAY_TIMEOUT_MS")
            && let Ok(ms) = timeout.parse()
        {
            self.gateway.request_timeout_ms = ms;
        }
        if let Ok(interval) = std::env::var("PFI_EXCHANGE_POLL_INTERVAL_SECS")
            && let Ok(secs) = interval.parse()
        {
            self.reconciler.poll_interval_secs = secs;
        }
        if let Ok(subject) = std::env::var("PFI_EXCHANGE_IDENTITY_SUBJECT") {
            self.identity.subject = subject;
        }
        if let Ok(level) = std::env::var("PFI_EXCHANGE_LOG_LEVEL") {
            self.log.level = level;
        }
        if let Ok(format) = std::env::var("PFI_EXCHANGE_LOG_FORMAT") {
            self.log.format = match format.to_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                _ => LogFormat::Json,
            };
        }
        if let Ok(name) = std::env::var("PFI_EXCHANGE_SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(env) = std::env::var("PFI_EXCHANGE_ENVIRONMENT") {
            self.service.environment = env;
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range or malformed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gateway.base_url.starts_with("http://")
            && !self.gateway.base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "gateway.base_url".to_string(),
                message: format!("'{}' is not an http(s) URL", self.gateway.base_url),
            });
        }
        if self.gateway.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gateway.request_timeout_ms".to_string(),
                message: "timeout must be positive".to_string(),
            });
        }
        if self.reconciler.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reconciler.poll_interval_secs".to_string(),
                message: "interval must be positive".to_string(),
            });
        }
        if self.submission.lanes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "submission.lanes".to_string(),
                message: "at least one lane is required".to_string(),
            });
        }
        if self.submission.queue_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "submission.queue_capacity".to_string(),
                message: "capacity must be positive".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "log.level".to_string(),
                message: format!(
                    "invalid log level '{}', must be one of: {:?}",
                    self.log.level, valid_levels
                ),
            });
        }

        Ok(())
    }
}

// ============================================================================
// Default Value Functions
// ============================================================================

fn default_gateway_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_gateway_timeout_ms() -> u64 {
    10_000
}

fn default_poll_interval_secs() -> u64 {
    80
}

fn default_max_concurrent_fetches() -> usize {
    8
}

fn default_submission_lanes() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    64
}

fn default_identity_subject() -> String {
    "did:key:wallet-local".to_string()
}

fn default_identity_key_id() -> String {
    "key-1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "pfi-exchange".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}
