use http::{HeaderMap, HeaderName, HeaderValue};

use crate::config::SanitizeConfig;

/// What to do with a single response header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderOp {
    Remove,
    Set(String),
}

/// A single header rewrite, applied to every outbound response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDirective {
    pub name: String,
    pub op: HeaderOp,
}

impl HeaderDirective {
    pub fn remove(name: &str) -> Self {
        Self { name: name.to_string(), op: HeaderOp::Remove }
    }

    pub fn set(name: &str, value: &str) -> Self {
        Self { name: name.to_string(), op: HeaderOp::Set(value.to_string()) }
    }
}

/// Headers that advertise the implementation behind the proxy
const FINGERPRINT_HEADERS: &[&str] = &[
    "x-powered-by",
    "server",
    "x-pingback",
    "x-generator",
    // REST discovery and shortlink advertisements travel in Link headers
    "link",
];

/// Build the directive list for a deployment
pub fn build_directives(cfg: &SanitizeConfig) -> Vec<HeaderDirective> {
    let mut directives = Vec::new();

    if cfg.strip_fingerprint_headers {
        directives.extend(FINGERPRINT_HEADERS.iter().map(|h| HeaderDirective::remove(h)));
    }
    directives.extend(cfg.remove.iter().map(|h| HeaderDirective::remove(h)));
    directives.extend(cfg.set.iter().map(|h| HeaderDirective::set(&h.name, &h.value)));

    directives
}

/// Apply directives to a response header map
///
/// Idempotent: applying the same directive list twice leaves the map in
/// the same state as applying it once. Unparseable directive names or
/// values are skipped with a warning rather than failing the response.
pub fn apply_directives(headers: &mut HeaderMap, directives: &[HeaderDirective]) {
    for directive in directives {
        let Ok(name) = HeaderName::from_bytes(directive.name.to_lowercase().as_bytes()) else {
            tracing::warn!(header = %directive.name, "Failed to parse header name in directive");
            continue;
        };

        match &directive.op {
            HeaderOp::Remove => {
                if headers.remove(&name).is_some() {
                    tracing::trace!(header = %directive.name, "Removed header");
                }
            }
            HeaderOp::Set(value) => match HeaderValue::from_str(value) {
                Ok(hv) => {
                    headers.insert(name, hv);
                    tracing::trace!(header = %directive.name, value = %value, "Set header");
                }
                Err(e) => {
                    tracing::warn!(
                        header = %directive.name,
                        value = %value,
                        error = %e,
                        "Failed to parse header value in directive"
                    );
                }
            },
        }
    }
}
