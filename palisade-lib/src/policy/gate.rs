use http::StatusCode;
use std::borrow::Cow;

use crate::config::GateConfig;
use crate::policy::rule::{build_rules, PolicyRule, RuleAction};

/// Why the gate refused a request. Each reason maps to a fixed terminal
/// response; nothing else about the request leaks into the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// Empty path, missing leading slash, or control characters
    MalformedPath,
    /// The XML-RPC endpoint is disabled for every caller
    XmlRpcDisabled,
    /// Syndication feeds are disabled for unauthenticated callers
    FeedDisabled,
    /// Core REST namespace requires authentication
    RestUnauthorized,
    /// A deployment-supplied deny rule matched
    Blocked(String),
}

impl DenyReason {
    pub fn status(&self) -> StatusCode {
        match self {
            DenyReason::MalformedPath => StatusCode::BAD_REQUEST,
            DenyReason::XmlRpcDisabled => StatusCode::FORBIDDEN,
            // Feed denial is a plain page, not an error, matching the
            // upstream CMS convention this models
            DenyReason::FeedDisabled => StatusCode::OK,
            DenyReason::RestUnauthorized => StatusCode::UNAUTHORIZED,
            DenyReason::Blocked(_) => StatusCode::FORBIDDEN,
        }
    }

    pub fn body(&self) -> Cow<'static, str> {
        match self {
            DenyReason::MalformedPath => Cow::Borrowed("Bad request."),
            DenyReason::XmlRpcDisabled => {
                Cow::Borrowed("XML-RPC services are disabled on this site.")
            }
            DenyReason::FeedDisabled => Cow::Borrowed("Feed has been disabled."),
            DenyReason::RestUnauthorized => Cow::Borrowed("You are not currently logged in."),
            DenyReason::Blocked(name) => Cow::Owned(format!("Access denied by rule: {name}")),
        }
    }
}

/// Gate decision for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Endpoint gate: an ordered, immutable rule list evaluated per request
///
/// Matching is total: the first matching rule wins and unmatched paths
/// default to Allow. Malformed paths are denied before any rule runs.
#[derive(Debug, Clone)]
pub struct Gate {
    rules: Vec<PolicyRule>,
}

impl Gate {
    pub fn new(rules: Vec<PolicyRule>) -> Self {
        Self { rules }
    }

    pub fn from_config(cfg: &GateConfig) -> Self {
        Self::new(build_rules(cfg))
    }

    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    pub fn decide(&self, path: &str, is_authenticated: bool) -> Decision {
        if validate_path(path).is_err() {
            return Decision::Deny(DenyReason::MalformedPath);
        }

        for rule in &self.rules {
            if !rule.matcher.matches(path) {
                continue;
            }
            tracing::debug!(rule = %rule.name, path, "gate rule matched");
            return match &rule.action {
                RuleAction::Allow => Decision::Allow,
                RuleAction::Deny(reason) => Decision::Deny(reason.clone()),
                RuleAction::RequireAuth(reason) => {
                    if is_authenticated {
                        Decision::Allow
                    } else {
                        Decision::Deny(reason.clone())
                    }
                }
            };
        }

        Decision::Allow
    }
}

/// Reject paths the gate cannot reason about: empty, relative, or
/// carrying ASCII control characters. The gate fails closed on these.
pub fn validate_path(path: &str) -> crate::error::Result<()> {
    let well_formed =
        !path.is_empty() && path.starts_with('/') && !path.bytes().any(|b| b.is_ascii_control());
    if well_formed {
        Ok(())
    } else {
        Err(crate::error::PolicyError::MalformedPath(path.to_string()))
    }
}
