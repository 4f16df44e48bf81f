use std::path::PathBuf;

use crate::cli::Cli;

/// Application configuration derived from the CLI.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_secret: String,
    pub dest_dir: PathBuf,
    pub license: u8,
    pub metadata_only: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("dest_dir", &self.dest_dir)
            .field("license", &self.license)
            .field("metadata_only", &self.metadata_only)
            .finish()
    }
}

/// Expand ~ to the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Config {
    pub fn from_cli(cli: Cli) -> Self {
        Self {
            api_key: cli.api_key,
            api_secret: cli.api_secret,
            dest_dir: expand_tilde(&cli.dest_dir),
            license: cli.license,
            metadata_only: cli.metadata_only,
        }
    }
}
