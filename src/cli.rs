// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Everything has a default, so running the binary with no arguments mirrors
// the ogl-sample project from the archived oss.sgi.com CVSweb.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// =============================================================================

use crate::config::{
    MirrorConfig, DEFAULT_FILE_TIMEOUT_SECS, DEFAULT_LISTING_TIMEOUT_SECS, DEFAULT_REQUEST_DELAY_MS,
    DEFAULT_USER_AGENT,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

// The archived CVSweb directory mirrored when no URL is given
pub const DEFAULT_ROOT_URL: &str =
    "https://web.archive.org/web/20171010115113/http://oss.sgi.com/cgi-bin/cvsweb.cgi/projects/ogl-sample/";

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "cvsweb-mirror",
    version,
    about = "Mirror the latest revision of every file from an archived CVSweb repository",
    long_about = "cvsweb-mirror walks the directory listings of a CVSweb installation (usually a \
                  web.archive.org capture) and downloads the latest revision of each file, \
                  reproducing the repository tree on disk. Please use it sparingly."
)]
pub struct Cli {
    /// CVSweb directory URL to mirror (must contain .../cvsweb.cgi/<path>)
    #[arg(default_value = DEFAULT_ROOT_URL)]
    pub root_url: String,

    /// Directory the mirror is created in
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Pause after every successful request, in milliseconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_DELAY_MS)]
    pub delay_ms: u64,

    /// Timeout for directory listing pages, in seconds
    #[arg(long, default_value_t = DEFAULT_LISTING_TIMEOUT_SECS)]
    pub listing_timeout: u64,

    /// Timeout for file downloads, in seconds
    #[arg(long, default_value_t = DEFAULT_FILE_TIMEOUT_SECS)]
    pub file_timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Cli {
    // Builds the run configuration from the parsed flags
    pub fn config(&self) -> MirrorConfig {
        MirrorConfig {
            user_agent: self.user_agent.clone(),
            listing_timeout: Duration::from_secs(self.listing_timeout),
            file_timeout: Duration::from_secs(self.file_timeout),
            request_delay: Duration::from_millis(self.delay_ms),
            output_dir: self.output_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["cvsweb-mirror"]).unwrap();
        let config = cli.config();
        let defaults = MirrorConfig::default();

        assert_eq!(cli.root_url, DEFAULT_ROOT_URL);
        assert_eq!(config.listing_timeout, defaults.listing_timeout);
        assert_eq!(config.file_timeout, defaults.file_timeout);
        assert_eq!(config.request_delay, defaults.request_delay);
        assert_eq!(config.user_agent, defaults.user_agent);
        assert_eq!(config.output_dir, defaults.output_dir);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "cvsweb-mirror",
            "http://host/cgi-bin/cvsweb.cgi/inventor/",
            "--output-dir",
            "/tmp/mirror",
            "--delay-ms",
            "0",
            "--file-timeout",
            "120",
        ])
        .unwrap();
        let config = cli.config();

        assert_eq!(cli.root_url, "http://host/cgi-bin/cvsweb.cgi/inventor/");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/mirror"));
        assert_eq!(config.request_delay, Duration::ZERO);
        assert_eq!(config.file_timeout, Duration::from_secs(120));
    }
}
