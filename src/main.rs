//! flickr-crawl — fetches openly licensed photos from the Flickr search API.
//!
//! Walks the paginated search results for a given license class, resolves
//! each hit into full metadata plus a Medium 640 JPEG, and stores
//! `<id>.jpg` / `<id>.json` pairs in a flat destination directory.
//! Identifiers already present in the directory are skipped, so interrupted
//! runs resume where they left off.

#![warn(clippy::all)]

mod cli;
mod config;
mod discover;
mod flickr;
mod pipeline;
mod resolve;
mod store;
mod types;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let filter = match cli.log_level {
        types::LogLevel::Debug => "debug",
        types::LogLevel::Info => "info",
        types::LogLevel::Warn => "warn",
        types::LogLevel::Error => "error",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = config::Config::from_cli(cli);
    let client = flickr::FlickrClient::new(config.api_key.clone(), config.api_secret.clone());

    pipeline::run(&client, &config).await
}
