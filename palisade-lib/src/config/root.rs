use serde::Deserialize;
use std::net::SocketAddr;

use super::gate::GateConfig;
use super::sanitize::SanitizeConfig;
use super::site::SiteConfig;
use super::timeout::TimeoutConfig;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Address and port to listen on
    /// Example: "0.0.0.0:7000" or "127.0.0.1:8080"
    pub listen: SocketAddr,
    /// Upstream origin that renders allowed requests
    pub upstream: Upstream,
    /// Endpoint gate configuration
    #[serde(default)]
    pub gate: GateConfig,
    /// Response sanitization configuration
    #[serde(default)]
    pub sanitize: SanitizeConfig,
    /// Site-wide hardening policies
    #[serde(default)]
    pub site: SiteConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Timeout configuration
    #[serde(default)]
    pub timeout: TimeoutConfig,
}

/// Upstream origin address
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Upstream {
    /// Host and port, e.g. "localhost:8080"
    pub address: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level filter when RUST_LOG is not set
    /// Default: "info"
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Include the module target in log lines
    /// Default: false
    #[serde(default)]
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), show_target: false }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
