use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{PolicyError, Result};

pub fn load_from_path<P: AsRef<Path>>(p: P) -> Result<Config> {
    let txt = fs::read_to_string(p)
        .map_err(|e| PolicyError::Config(format!("Failed to read config file: {e}")))?;
    let cfg: Config = toml::from_str(&txt)
        .map_err(|e| PolicyError::Config(format!("Failed to parse config: {e}")))?;

    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &Config) -> Result<()> {
    if cfg.upstream.address.is_empty() {
        return Err(PolicyError::NoUpstream);
    }
    if !cfg.upstream.address.contains(':') {
        return Err(PolicyError::Config(format!(
            "Upstream address must be host:port, got: {}",
            cfg.upstream.address
        )));
    }

    if !cfg.gate.rest_root.starts_with('/') {
        return Err(PolicyError::Config(format!(
            "Gate rest_root must start with '/', got: {}",
            cfg.gate.rest_root
        )));
    }
    if cfg.gate.rest_reserved_namespace.is_empty()
        || cfg.gate.rest_reserved_namespace.contains('/')
    {
        return Err(PolicyError::Config(format!(
            "Gate rest_reserved_namespace must be a single path segment, got: {}",
            cfg.gate.rest_reserved_namespace
        )));
    }

    for rule in &cfg.gate.deny {
        if rule.name.is_empty() {
            return Err(PolicyError::Config("Deny rule with empty name".to_string()));
        }
        if !rule.prefix.starts_with('/') {
            return Err(PolicyError::Config(format!(
                "Deny rule '{}' prefix must start with '/', got: {}",
                rule.name, rule.prefix
            )));
        }
    }

    for header in &cfg.sanitize.set {
        if header.name.is_empty() {
            return Err(PolicyError::Config("Sanitize set directive with empty header name".to_string()));
        }
    }

    Ok(())
}
