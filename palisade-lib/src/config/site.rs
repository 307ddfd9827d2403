use serde::Deserialize;

/// Site-wide hardening policies, loaded once at startup
///
/// These model deployment constants: they are read-only inputs to the
/// request pipeline and cannot be changed while the process runs.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Answer plain-HTTP requests for admin paths with a redirect to HTTPS
    /// Default: true
    #[serde(default = "default_true")]
    pub force_ssl_admin: bool,
    /// Debug mode (verbose request logging)
    /// Default: false
    #[serde(default)]
    pub debug_mode: bool,
    /// Cap on stored content revisions, advertised to the upstream via the
    /// x-palisade-max-revisions request header
    /// Default: 5
    #[serde(default = "default_max_revisions")]
    pub max_revisions: u32,
    /// Lock upstream file editing (advisory x-palisade-file-edit header)
    /// Default: true
    #[serde(default = "default_true")]
    pub disallow_file_edit: bool,
    /// Lock upstream file modifications such as installs and updates
    /// Default: true
    #[serde(default = "default_true")]
    pub disallow_file_mods: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            force_ssl_admin: true,
            debug_mode: false,
            max_revisions: default_max_revisions(),
            disallow_file_edit: true,
            disallow_file_mods: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_revisions() -> u32 {
    5
}
