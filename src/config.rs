// src/config.rs
// =============================================================================
// Settings shared by every request of a mirror run.
//
// The crawler never reads global state: main.rs builds one MirrorConfig from
// the command line and hands it to Mirror::new().
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

// Browser-like agent; some archive front ends reject unknown clients
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 ",
    "(KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36 cvsweb-mirror/",
    env!("CARGO_PKG_VERSION")
);

pub const DEFAULT_LISTING_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_FILE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Timeout for directory listing pages
    pub listing_timeout: Duration,
    /// Timeout for file downloads (files may be large)
    pub file_timeout: Duration,
    /// Pause after every successful response
    pub request_delay: Duration,
    /// Directory the mirror root is created in
    pub output_dir: PathBuf,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            listing_timeout: Duration::from_secs(DEFAULT_LISTING_TIMEOUT_SECS),
            file_timeout: Duration::from_secs(DEFAULT_FILE_TIMEOUT_SECS),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            output_dir: PathBuf::from("."),
        }
    }
}
