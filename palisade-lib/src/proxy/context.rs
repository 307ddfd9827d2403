use http::HeaderMap;
use hyper::Request;
use std::sync::Arc;

use crate::config::{Config, ConfigStore, GateConfig};
use crate::policy::Gate;
use crate::proxy::forwarding::{create_client, HttpClient};
use crate::sanitize::{build_directives, HeaderDirective};

/// Immutable per-process engine state shared by every request task
pub struct EngineContext {
    pub config: Arc<Config>,
    pub gate: Gate,
    pub directives: Vec<HeaderDirective>,
    pub store: Arc<ConfigStore>,
    pub client: HttpClient,
}

impl EngineContext {
    pub fn new(config: Arc<Config>, store: Arc<ConfigStore>) -> Self {
        let gate = Gate::from_config(&config.gate);
        let directives = build_directives(&config.sanitize);
        let client = create_client(&config.timeout);
        Self { config, gate, directives, store, client }
    }
}

/// Per-request transient state, dropped when the response is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub path: String,
    pub is_authenticated: bool,
}

impl RequestContext {
    pub fn from_request<B>(req: &Request<B>, gate_cfg: &GateConfig) -> Self {
        let path = req.uri().path().to_string();
        let is_authenticated = has_trusted_header(req.headers(), &gate_cfg.trusted_auth_header)
            || has_session_cookie(req.headers(), &gate_cfg.auth_cookie_prefix);
        Self { path, is_authenticated }
    }
}

fn has_trusted_header(headers: &HeaderMap, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn has_session_cookie(headers: &HeaderMap, prefix: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }
    headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .any(|cookie| cookie.trim_start().starts_with(prefix))
}
