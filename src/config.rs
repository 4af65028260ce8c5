use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

/// Cosmetic variant of the deployment. Both variants share one core; only
/// banner voice and the default retry delay differ.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Navishield,
    Phishspotter,
}

impl Variant {
    /// Observed default wait between classifier attempts for each variant.
    pub fn default_retry_delay_ms(&self) -> u64 {
        match self {
            Variant::Navishield => 5000,
            Variant::Phishspotter => 8000,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_variant")]
    pub variant: Variant,

    #[serde(default = "default_api_port")]
    pub api_port: u16,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub check: CheckConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub stats: StatsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClassifierConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed wait between attempts. When absent, the variant default applies.
    #[serde(default)]
    pub retry_delay_ms: Option<u64>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_cache_backend")]
    pub backend: String,
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u64,
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CheckConfig {
    #[serde(default = "default_auto_check")]
    pub auto_check_enabled: bool,
    #[serde(default = "default_banner_enabled")]
    pub banner_enabled: bool,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_enable")]
    pub enable: bool,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_check_log_sinks")]
    pub check_log_sinks: Vec<String>,
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StatsConfig {
    #[serde(default = "default_stats_enable")]
    pub enable: bool,
    #[serde(default = "default_log_interval")]
    pub log_interval_seconds: u64,
}

// Defaults
fn default_variant() -> Variant {
    Variant::Navishield
}
fn default_api_port() -> u16 {
    8090
}
fn default_endpoint() -> String {
    "https://phishspotter.onrender.com".to_string()
}
fn default_max_attempts() -> u32 {
    3
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_cache_backend() -> String {
    "sqlite".to_string()
}
fn default_ttl_days() -> u64 {
    30
}
fn default_sqlite_path() -> String {
    "phishwatch.db".to_string()
}
fn default_auto_check() -> bool {
    false
}
fn default_banner_enabled() -> bool {
    true
}
fn default_confidence_threshold() -> f64 {
    0.80
}
fn default_log_enable() -> bool {
    true
}
fn default_log_format() -> String {
    "text".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_check_log_sinks() -> Vec<String> {
    vec!["console".to_string()]
}
fn default_memory_capacity() -> usize {
    200
}
fn default_stats_enable() -> bool {
    true
}
fn default_log_interval() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            api_port: default_api_port(),
            classifier: ClassifierConfig::default(),
            cache: CacheConfig::default(),
            check: CheckConfig::default(),
            logging: LoggingConfig::default(),
            stats: StatsConfig::default(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_cache_backend(),
            ttl_days: default_ttl_days(),
            sqlite_path: default_sqlite_path(),
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            auto_check_enabled: default_auto_check(),
            banner_enabled: default_banner_enabled(),
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable: default_log_enable(),
            format: default_log_format(),
            level: default_log_level(),
            check_log_sinks: default_check_log_sinks(),
            memory_capacity: default_memory_capacity(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            enable: default_stats_enable(),
            log_interval_seconds: default_log_interval(),
        }
    }
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config TOML")?;
        Ok(config)
    }

    /// Verdict freshness window.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_days * 24 * 60 * 60)
    }

    /// Effective wait between classifier attempts for this deployment.
    pub fn retry_delay(&self) -> Duration {
        let ms = self
            .classifier
            .retry_delay_ms
            .unwrap_or_else(|| self.variant.default_retry_delay_ms());
        Duration::from_millis(ms)
    }
}
