use serde::Deserialize;

/// Timeout configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Upstream connection timeout in milliseconds
    /// Default: 5000 (5 seconds)
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,
    /// Graceful shutdown timeout in seconds
    /// Default: 30
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_secs: u64,
    /// HTTP/1.1 keep-alive towards the upstream
    #[serde(default)]
    pub keep_alive: KeepAliveConfig,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: default_connect_timeout(),
            shutdown_secs: default_shutdown_timeout(),
            keep_alive: KeepAliveConfig::default(),
        }
    }
}

/// HTTP/1.1 keep-alive configuration for upstream connections
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct KeepAliveConfig {
    /// Reuse upstream TCP connections across requests
    /// Default: true
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// How long to keep idle upstream connections open, in seconds
    /// Default: 60
    #[serde(default = "default_keep_alive_timeout")]
    pub timeout_secs: u64,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self { enabled: true, timeout_secs: default_keep_alive_timeout() }
    }
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_keep_alive_timeout() -> u64 {
    60
}
