//! Loader configuration
//!
//! This module handles hierarchical configuration loading from multiple sources:
//! - Default configuration file
//! - Environment-specific configuration file
//! - Environment variables

use config::{Config, ConfigError, Environment, File};
use scene_assembly_source::CacheConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::error::{LoaderError, LoaderResult};

/// Loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Maximum number of manifest or package fetches in flight per sub-model
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// Load the fallback package set when no primary set exists
    #[serde(default = "default_true")]
    pub allow_fallback_packages: bool,

    /// Fetch cache settings
    #[serde(default)]
    pub cache: CacheSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_fetch_concurrency() -> usize {
    8
}

fn default_true() -> bool {
    true
}

/// Fetch cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Wrap the asset source in a cache
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum entries per artifact kind
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,

    /// Time-to-live in seconds
    #[serde(default = "default_ttl")]
    pub time_to_live_seconds: u64,
}

fn default_max_capacity() -> u64 {
    1_024
}

fn default_ttl() -> u64 {
    900
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            max_capacity: default_max_capacity(),
            time_to_live_seconds: default_ttl(),
        }
    }
}

impl CacheSettings {
    /// Settings for the source cache
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .with_max_capacity(self.max_capacity)
            .with_time_to_live(Duration::from_secs(self.time_to_live_seconds))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON formatting
    #[serde(default)]
    pub json_format: bool,

    /// Include thread IDs
    #[serde(default)]
    pub include_thread_ids: bool,

    /// Include target module
    #[serde(default = "default_true")]
    pub include_target: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            include_thread_ids: false,
            include_target: true,
        }
    }
}

impl LoaderConfig {
    /// Load configuration from files and environment
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default configuration file (config/default.toml)
    /// 2. Environment-specific file (config/{env}.toml)
    /// 3. Environment variables (SCENE_ASSEMBLY_*)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed
    pub fn load(config_dir: impl Into<PathBuf>, environment: &str) -> Result<Self, ConfigError> {
        let config_dir = config_dir.into();

        let config = Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", environment))).required(false))
            // e.g., SCENE_ASSEMBLY_CACHE__ENABLED=false
            .add_source(
                Environment::with_prefix("SCENE_ASSEMBLY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration with defaults if files don't exist
    pub fn load_or_default(config_dir: impl Into<PathBuf>, environment: &str) -> Self {
        Self::load(config_dir, environment).unwrap_or_else(|e| {
            warn!("Failed to load configuration, using defaults: {}", e);
            Self::default()
        })
    }

    /// Set fetch concurrency
    pub fn with_fetch_concurrency(mut self, fetch_concurrency: usize) -> Self {
        self.fetch_concurrency = fetch_concurrency;
        self
    }

    /// Allow or forbid the fallback package set
    pub fn with_allow_fallback_packages(mut self, allow: bool) -> Self {
        self.allow_fallback_packages = allow;
        self
    }

    /// Enable or disable the fetch cache
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache.enabled = enabled;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> LoaderResult<()> {
        if self.fetch_concurrency == 0 {
            return Err(LoaderError::Configuration(
                "fetch_concurrency must be at least 1".to_string(),
            ));
        }
        if self.cache.enabled && self.cache.max_capacity == 0 {
            return Err(LoaderError::Configuration(
                "cache.max_capacity must be at least 1 when the cache is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            fetch_concurrency: default_fetch_concurrency(),
            allow_fallback_packages: default_true(),
            cache: CacheSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Get the current environment name
///
/// Reads from the `ENVIRONMENT` or `ENV` environment variable,
/// defaulting to "development" if not set.
pub fn get_environment() -> String {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get the configuration directory
///
/// Reads from the `CONFIG_DIR` environment variable,
/// defaulting to "config" if not set.
pub fn get_config_dir() -> PathBuf {
    std::env::var("CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"))
}
