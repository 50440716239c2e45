//! Application entry point — postcraft API server.
//!
//! # Startup sequence
//!
//! 1. Read `.env` into the process environment, when present.
//! 2. Initialise logging.
//! 3. Load [`AppConfig`] from disk (returns default on first run).
//! 4. Overlay environment variables and validate provider credentials.
//! 5. Build the [`GenerationOrchestrator`] from config.
//! 6. Serve the HTTP API until the process is stopped.

use std::sync::Arc;

use anyhow::Context;
use postcraft::{config::AppConfig, pipeline::GenerationOrchestrator, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env (reported once logging is up)
    let dotenv = dotenvy::dotenv();

    // 2. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("postcraft {} starting up", env!("CARGO_PKG_VERSION"));
    match dotenv {
        Ok(path) => log::info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => log::debug!("No .env file found"),
        Err(e) => log::warn!("Failed to read .env ({e}); continuing without it"),
    }

    // 3. Config file
    let settings_path = AppConfig::settings_path();
    let mut config = AppConfig::load_from(&settings_path)
        .with_context(|| format!("failed to load config from {}", settings_path.display()))?;

    // 4. Environment overrides + credential check
    config.apply_env();
    config.validate()?;
    log::info!(
        "Providers: primary {} @ {}, fallback {} @ {}",
        config.primary.model,
        config.primary.base_url,
        config.fallback.model,
        config.fallback.base_url,
    );
    if !config.generation.scoring_enabled {
        log::info!("Virality scoring disabled");
    }

    // 5. Pipeline
    let orchestrator = Arc::new(GenerationOrchestrator::from_config(&config));

    // 6. HTTP
    server::serve(&config.server.bind_addr, orchestrator).await
}
