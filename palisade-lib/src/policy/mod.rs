pub mod gate;
pub mod rule;

pub use gate::{validate_path, Decision, DenyReason, Gate};
pub use rule::{build_rules, PathPattern, PolicyRule, RuleAction};
