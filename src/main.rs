use clap::Parser;
use courier::config::{Cli, Config};
use courier::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::from_cli(Cli::parse())?;

    match &cfg.files.directory {
        Some(dir) => tracing::info!(directory = %dir.display(), "Serving files"),
        None => tracing::warn!("No --directory given, /files/ routes will fail"),
    }

    tokio::select! {
        res = server::listener::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
