use crate::config::GateConfig;
use crate::policy::gate::DenyReason;

/// Path classes a rule can match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Exact path match
    Exact(String),
    /// Path prefix match
    Prefix(String),
    /// Any path containing a whole `feed` segment
    /// Matches `/feed/`, `/comments/feed/`, `/tag/news/feed/rss2/`
    FeedRoute,
    /// Paths under a reserved REST namespace (`<root>/<namespace>/...`)
    RestNamespace { root: String, namespace: String },
}

impl PathPattern {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(p) => path == p,
            PathPattern::Prefix(p) => path.starts_with(p.as_str()),
            PathPattern::FeedRoute => path
                .split('/')
                .any(|segment| segment.eq_ignore_ascii_case("feed")),
            PathPattern::RestNamespace { root, namespace } => {
                let Some(rest) = path.strip_prefix(root.as_str()) else {
                    return false;
                };
                let Some(rest) = rest.strip_prefix('/') else {
                    return false;
                };
                rest.split('/').next().unwrap_or("") == namespace
            }
        }
    }
}

/// What the gate does when a rule matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// Pass the request through to the upstream
    Allow,
    /// Terminal deny for every caller
    Deny(DenyReason),
    /// Terminal deny unless the caller is authenticated
    RequireAuth(DenyReason),
}

/// A single gate rule. Immutable once constructed; the gate owns an
/// ordered list of these and the first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRule {
    pub name: String,
    pub matcher: PathPattern,
    pub action: RuleAction,
}

/// Build the rule list for a deployment: the fixed hardening set first,
/// then any deployment-supplied deny rules.
pub fn build_rules(cfg: &GateConfig) -> Vec<PolicyRule> {
    let mut rules = vec![
        PolicyRule {
            name: "xmlrpc".to_string(),
            matcher: PathPattern::Exact("/xmlrpc.php".to_string()),
            action: RuleAction::Deny(DenyReason::XmlRpcDisabled),
        },
        PolicyRule {
            name: "feeds".to_string(),
            matcher: PathPattern::FeedRoute,
            action: RuleAction::RequireAuth(DenyReason::FeedDisabled),
        },
        PolicyRule {
            name: "core-rest".to_string(),
            matcher: PathPattern::RestNamespace {
                root: cfg.rest_root.clone(),
                namespace: cfg.rest_reserved_namespace.clone(),
            },
            action: RuleAction::RequireAuth(DenyReason::RestUnauthorized),
        },
    ];

    for custom in &cfg.deny {
        let reason = DenyReason::Blocked(custom.name.clone());
        rules.push(PolicyRule {
            name: custom.name.clone(),
            matcher: PathPattern::Prefix(custom.prefix.clone()),
            action: if custom.allow_authenticated {
                RuleAction::RequireAuth(reason)
            } else {
                RuleAction::Deny(reason)
            },
        });
    }

    rules
}
