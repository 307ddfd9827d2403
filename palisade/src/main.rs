#![forbid(unsafe_code)]

use clap::Parser;
use palisade_lib::config::{load_from_path, ConfigStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Request-hardening policy proxy")]
struct Cli {
    /// Path to configuration TOML file
    #[arg(short, long, value_name = "FILE", default_value = "palisade.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match load_from_path(&cli.config) {
        Ok(cfg) => {
            init_tracing(&cfg.logging.level, cfg.logging.show_target);
            info!(?cfg.listen, upstream = %cfg.upstream.address, "configuration loaded");

            let store = Arc::new(ConfigStore::new());
            if let Err(err) = store.load(cfg.site.clone()) {
                error!(%err, "failed to load site config store");
                std::process::exit(1);
            }

            let cfg = Arc::new(cfg);
            if let Err(err) = palisade_lib::run(cfg, store).await {
                error!(%err, "proxy exited with error");
                std::process::exit(1);
            }
        }
        Err(err) => {
            init_tracing("info", false);
            error!(%err, "failed to load configuration");
            std::process::exit(1);
        }
    }
}

fn init_tracing(default_level: &str, show_target: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(show_target)
        .init();
}
