use clap::Parser;

use crate::types::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "flickr-crawl",
    about = "Fetch openly licensed photos from the Flickr search API"
)]
pub struct Cli {
    /// Flickr API key
    pub api_key: String,

    /// Flickr API secret
    pub api_secret: String,

    /// Where the fetched images and metadata are stored
    pub dest_dir: String,

    /// License code filter (0-8); 4 is CC Attribution
    #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(0..=8))]
    pub license: u8,

    /// Record metadata only, without downloading image bytes
    #[arg(long)]
    pub metadata_only: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
