use serde::Deserialize;

/// Endpoint gate configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Root path prefix of the upstream's REST surface
    /// Default: "/wp-json"
    #[serde(default = "default_rest_root")]
    pub rest_root: String,
    /// Reserved REST namespace denied to unauthenticated callers.
    /// Other namespaces under the REST root stay open.
    /// Default: "wp"
    #[serde(default = "default_reserved_namespace")]
    pub rest_reserved_namespace: String,
    /// Requests carrying a cookie whose name starts with this prefix are
    /// treated as authenticated
    /// Default: "wordpress_logged_in_"
    #[serde(default = "default_auth_cookie_prefix")]
    pub auth_cookie_prefix: String,
    /// Trusted internal header marking a request as authenticated.
    /// Disabled when empty. Set it only when the proxy is reachable
    /// exclusively through infrastructure that strips the header from
    /// client traffic, otherwise any caller can forge it.
    /// Default: "" (disabled)
    #[serde(default)]
    pub trusted_auth_header: String,
    /// Extra deny rules evaluated after the built-in set (optional)
    #[serde(default)]
    pub deny: Vec<CustomRuleConfig>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            rest_root: default_rest_root(),
            rest_reserved_namespace: default_reserved_namespace(),
            auth_cookie_prefix: default_auth_cookie_prefix(),
            trusted_auth_header: String::new(),
            deny: vec![],
        }
    }
}

/// Deployment-supplied deny rule
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CustomRuleConfig {
    /// Rule name, used in logs and the terminal response
    pub name: String,
    /// Path prefix the rule matches
    pub prefix: String,
    /// When true, authenticated callers bypass the rule
    #[serde(default)]
    pub allow_authenticated: bool,
}

fn default_rest_root() -> String {
    "/wp-json".to_string()
}

fn default_reserved_namespace() -> String {
    "wp".to_string()
}

fn default_auth_cookie_prefix() -> String {
    "wordpress_logged_in_".to_string()
}
