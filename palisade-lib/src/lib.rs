#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod policy;
pub mod proxy;
pub mod sanitize;

pub use config::{load_from_path, Config, ConfigStore, SiteConfig};
pub use error::{PolicyError, Result};
pub use policy::{Decision, DenyReason, Gate, PathPattern, PolicyRule, RuleAction};
pub use proxy::{run, RequestContext};
pub use sanitize::{apply_directives, filter_links, trim_head, HeaderDirective, LinkTag};
