//! Configuration management for citescope services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default.toml, config/{APP_ENV}.toml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Local record source
    #[serde(default)]
    pub data: DataConfig,

    /// OpenAlex lookups
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Citation graph limits
    #[serde(default)]
    pub graph: GraphConfig,

    /// Record listing defaults
    #[serde(default)]
    pub listing: ListingConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    /// Path or http(s) URL of the enhanced OpenAlex export
    #[serde(default = "default_data_source")]
    pub source: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Allow graph builds to fall back to the OpenAlex API
    #[serde(default)]
    pub enabled: bool,

    /// Work endpoint; the record suffix is appended verbatim
    #[serde(default = "default_remote_base_url")]
    pub base_url: String,

    /// Minimum spacing between two remote calls in milliseconds (0 disables)
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,

    /// Cited-by page size requested per node
    #[serde(default = "default_per_page")]
    pub per_page: usize,

    /// How many `referenced_works` a normalized remote record keeps
    #[serde(default = "default_reference_limit")]
    pub reference_limit: usize,

    /// Request timeout in seconds
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,

    /// Contact address for the OpenAlex polite pool
    pub mailto: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphConfig {
    /// Depth used when a request omits it
    #[serde(default = "default_depth")]
    pub default_depth: usize,

    /// Hard upper bound on requested depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level / EnvFilter directive (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Metrics port (0 to disable)
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 120 }
fn default_data_source() -> String { "data/crp_openalex_enhanced.json".to_string() }
fn default_remote_base_url() -> String { "https://api.openalex.org/works/".to_string() }
fn default_throttle_ms() -> u64 { 200 }
fn default_per_page() -> usize { 50 }
fn default_reference_limit() -> usize { 50 }
fn default_remote_timeout() -> u64 { 20 }
fn default_depth() -> usize { 1 }
fn default_max_depth() -> usize { 4 }
fn default_page_size() -> usize { 25 }
fn default_max_page_size() -> usize { 200 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_metrics_port() -> u16 { 9090 }
fn default_service_name() -> String { "citescope".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { source: default_data_source() }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_remote_base_url(),
            throttle_ms: default_throttle_ms(),
            per_page: default_per_page(),
            reference_limit: default_reference_limit(),
            timeout_secs: default_remote_timeout(),
            mailto: None,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            default_depth: default_depth(),
            max_depth: default_max_depth(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_port: default_metrics_port(),
            service_name: default_service_name(),
        }
    }
}

impl RemoteConfig {
    /// Throttle spacing as Duration
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Remote request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__REMOTE__ENABLED=true
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            data: DataConfig::default(),
            remote: RemoteConfig::default(),
            graph: GraphConfig::default(),
            listing: ListingConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert!(!config.remote.enabled);
        assert_eq!(config.remote.per_page, 50);
        assert_eq!(config.graph.default_depth, 1);
    }

    #[test]
    fn test_partial_source_fills_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(config::File::from_str(
                "[remote]\nenabled = true\nthrottle_ms = 0\n[data]\nsource = \"records.json\"\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(config.remote.enabled);
        assert_eq!(config.remote.throttle(), Duration::ZERO);
        assert_eq!(config.remote.base_url, "https://api.openalex.org/works/");
        assert_eq!(config.data.source, "records.json");
        assert_eq!(config.listing.default_page_size, 25);
    }

    #[test]
    fn test_from_file_reads_shipped_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/default.toml");
        let config = AppConfig::from_file(path).unwrap();

        assert_eq!(config.graph.max_depth, 4);
        assert_eq!(config.remote.per_page, 50);
        assert_eq!(config.observability.service_name, "citescope-gateway");
        // the binary logs under its own target
        assert!(config.observability.log_level.contains("gateway=debug"));
    }
}
