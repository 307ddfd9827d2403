mod gate;
mod loader;
mod root;
mod sanitize;
mod site;
mod store;
mod timeout;

pub use gate::{CustomRuleConfig, GateConfig};
pub use loader::load_from_path;
pub use root::{Config, LoggingConfig, Upstream};
pub use sanitize::{CustomHeader, SanitizeConfig};
pub use site::SiteConfig;
pub use store::ConfigStore;
pub use timeout::{KeepAliveConfig, TimeoutConfig};
