// src/fetch/wayback.rs
// =============================================================================
// Archive replay URLs look like this:
//
//   https://web.archive.org/web/20171010115113/http://oss.sgi.com/...
//
// The replay service wraps what it serves in its own toolbar and rewrites
// links. Adding "if_" right after the timestamp asks for the captured bytes
// as they were:
//
//   https://web.archive.org/web/20171010115113if_/http://oss.sgi.com/...
//
// Only checkout downloads go through this; listing pages and markup views
// are parsed as HTML and don't care about the wrapping.
// =============================================================================

use regex::Regex;
use std::sync::LazyLock;

// scheme://host/web/<14-digit timestamp>[if_]/<original url>
static REPLAY_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://[^/]+/web/\d{14})(if_)?(/.*)$").unwrap()
});

// Returns the raw-content variant of a replay URL.
//
// URLs that aren't replay URLs, or already carry the marker, come back unchanged.
pub fn raw_content_url(url: &str) -> String {
    match REPLAY_URL.captures(url) {
        Some(caps) if caps.get(2).is_none() => format!("{}if_{}", &caps[1], &caps[3]),
        _ => url.to_string(),
    }
}
