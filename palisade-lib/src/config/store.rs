use std::sync::{Arc, OnceLock};

use crate::config::SiteConfig;
use crate::error::{PolicyError, Result};

/// Write-once holder for the site policies
///
/// `load()` transitions the store from unloaded to loaded exactly once,
/// before request handling starts. `get()` is a lock-free read of the
/// loaded value for the rest of the process lifetime. There is no write
/// accessor after load: a second `load()` fails with `ConfigImmutable`,
/// and `get()` before the first `load()` fails with `ConfigNotLoaded`.
#[derive(Debug, Default)]
pub struct ConfigStore {
    slot: OnceLock<Arc<SiteConfig>>,
}

impl ConfigStore {
    pub const fn new() -> Self {
        Self { slot: OnceLock::new() }
    }

    pub fn load(&self, site: SiteConfig) -> Result<()> {
        self.slot
            .set(Arc::new(site))
            .map_err(|_| PolicyError::ConfigImmutable)
    }

    pub fn get(&self) -> Result<Arc<SiteConfig>> {
        self.slot
            .get()
            .cloned()
            .ok_or(PolicyError::ConfigNotLoaded)
    }
}
