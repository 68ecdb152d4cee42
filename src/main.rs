//! Smart Air Quality Predictor - Main Entry Point

mod api;
mod config;
mod constants;
mod logic;

use anyhow::Context;

use config::Config;
use logic::model::ModelStore;

fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);

    let config = Config::from_env();
    log::info!("Model directory: {}", config.model_dir.display());
    if !config.verify_checksums {
        log::warn!("Checksum verification disabled");
    }

    // Models are loaded exactly once; a failure here is fatal
    let store = ModelStore::load(&config.model_dir, config.verify_checksums)
        .inspect_err(|e| log::error!("Cannot serve predictions: {}", e))
        .with_context(|| format!("failed to load models from {}", config.model_dir.display()))?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    api::commands::run_session(&store, stdin.lock(), &mut stdout)
        .context("console session failed")?;

    log::info!("Session closed");
    Ok(())
}
