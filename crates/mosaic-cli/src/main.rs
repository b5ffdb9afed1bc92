use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mosaic_cli::{
    commands::{self, Cli},
    config::Config,
};
use mosaic_client::BackendFactory;
use mosaic_engine::Engine;
use mosaic_persist::JsonFileSnapshot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::debug!(
        backend = %config.backend.base_url,
        snapshot = %config.store.snapshot_path.display(),
        "Config loaded"
    );

    let backend = BackendFactory::create_backend(&config.backend)?;
    let snapshot = Arc::new(JsonFileSnapshot::new(config.store.snapshot_path.clone()));

    let engine = Engine::builder()
        .backend(backend)
        .snapshot(snapshot)
        .settings(config.settings.clone().into())
        .base_url(config.backend.base_url.clone())
        .build()
        .await?;

    let mutates = cli.command.mutates_threads();
    let result = commands::run(cli.command, &engine).await;

    // Save even when the command failed; a failed send still leaves messages behind
    if mutates {
        engine.save().await?;
    }

    result
}

/// Logs go to stderr so command output stays pipeable
fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
