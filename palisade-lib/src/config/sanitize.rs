use serde::Deserialize;

/// Response sanitization configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SanitizeConfig {
    /// Strip the built-in fingerprint header set (x-powered-by, server,
    /// x-pingback, x-generator, link)
    /// Default: true
    #[serde(default = "default_true")]
    pub strip_fingerprint_headers: bool,
    /// Additional response headers to remove (case-insensitive)
    #[serde(default)]
    pub remove: Vec<String>,
    /// Response headers to set to a fixed value (overwrites upstream value)
    #[serde(default)]
    pub set: Vec<CustomHeader>,
    /// Drop discovery/meta link tags from HTML head sections
    /// Default: true
    #[serde(default = "default_true")]
    pub trim_markup: bool,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            strip_fingerprint_headers: true,
            remove: vec![],
            set: vec![],
            trim_markup: true,
        }
    }
}

/// Header name/value pair for `set` directives
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CustomHeader {
    pub name: String,
    pub value: String,
}

fn default_true() -> bool {
    true
}
