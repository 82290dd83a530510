mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use redact_config::Config;
use redact_storage::Storage;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // The TUI owns the terminal, so only warnings get through by default
    let fallback = match cli.command {
        cli::Commands::Ui { .. } => "warn",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .init();

    let config = Config::load()?;
    debug!("Loaded config from {}", Config::config_path().display());

    // Initialize storage once (creates connection pool and runs migrations)
    let storage = Storage::new(Some(Config::data_path())).await?;

    let result = match cli.command {
        cli::Commands::File {
            path,
            categories,
            exclude,
            output,
            endpoint,
            preserve_filename,
        } => {
            let options = commands::file::FileOptions {
                categories,
                exclude,
                output,
                endpoint,
                preserve_filename,
            };
            commands::file::handle(&config, &storage, path, options).await
        }
        cli::Commands::Categories { json } => commands::file::categories(json),
        cli::Commands::Regions {
            path,
            categories,
            exclude,
        } => commands::regions::handle(&path, &categories, &exclude),
        cli::Commands::History { limit } => commands::history::handle(&storage, limit).await,
        cli::Commands::Route { path } => commands::route::handle(&storage, &path).await,
        cli::Commands::Admin(cmd) => commands::admin::handle(cmd, &config, &storage).await,
        cli::Commands::Serve { host, port } => commands::serve::handle(&config, host, port).await,
        cli::Commands::Ui { path } => commands::ui::handle(&config, &storage, path).await,
        cli::Commands::Config { path } => commands::config::handle(&config, path),
    };

    storage.close().await;
    result
}
