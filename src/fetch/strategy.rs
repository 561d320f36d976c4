// src/fetch/strategy.rs
// =============================================================================
// This module downloads one file revision from CVSweb.
//
// Strategy:
// - CVSweb can serve a file two ways, and archived captures may only have
//   one of them, so we try both in a fixed order:
//   1. Markup view: an HTML page with the file body in a <pre> block
//   2. Checkout: the raw file (through the archive's raw-content variant)
// - The first strategy that returns non-empty content wins
// - A failed strategy is not an error by itself; only "both failed" is
//
// Rust concepts:
// - Enums as a closed set of behaviours: adding a strategy means adding a
//   variant, and match makes sure every method handles it
// - Copy types: FetchStrategy is a plain tag, passed around by value
// =============================================================================

use super::http::Transport;
use super::markup::extract_file_text;
use super::wayback::raw_content_url;
use std::time::Duration;
use tracing::{error, info};

// Path segment CVSweb reserves for raw-file downloads
const CHECKOUT_PREFIX: &str = "~checkout~";

// Content type hint that makes CVSweb render a file as HTML
const MARKUP_CONTENT_TYPE: &str = "text/x-cvsweb-markup";

// The result of one download attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// The URL that was requested
    pub attempted_url: String,
    /// File content, or None if this attempt produced nothing usable
    pub content: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    Markup,
    Checkout,
}

// Strategies in priority order
pub const FETCH_ORDER: [FetchStrategy; 2] = [FetchStrategy::Markup, FetchStrategy::Checkout];

impl FetchStrategy {
    // Builds the URL this strategy requests
    pub fn url(self, cgi_base: &str, repository_path: &str, revision: &str) -> String {
        let base = cgi_base.trim_end_matches('/');
        let quoted = quote_path(repository_path);

        match self {
            FetchStrategy::Markup => format!(
                "{}/{}?rev={}&content-type={}",
                base, quoted, revision, MARKUP_CONTENT_TYPE
            ),
            FetchStrategy::Checkout => raw_content_url(&format!(
                "{}/{}/{}?rev={}",
                base, CHECKOUT_PREFIX, quoted, revision
            )),
        }
    }

    // Tries to download the file. Transport errors and unusable pages are
    // logged here and turn into `content: None`.
    pub async fn attempt(
        self,
        fetcher: &FileFetcher,
        repository_path: &str,
        revision: &str,
    ) -> FetchOutcome {
        let url = self.url(&fetcher.cgi_base, repository_path, revision);

        let content = match self {
            FetchStrategy::Markup => {
                info!("Downloading markup URL: {}", url);
                match fetcher.transport.get_text(&url, fetcher.timeout).await {
                    Ok(html) => match extract_file_text(&html) {
                        Some(text) => Some(text.into_bytes()),
                        None => {
                            error!("Fetched markup URL but found no usable <pre> block: {}", url);
                            None
                        }
                    },
                    Err(e) => {
                        error!("Error downloading {}: {}", url, e);
                        None
                    }
                }
            }
            FetchStrategy::Checkout => {
                info!("Downloading checkout URL: {}", url);
                match fetcher.transport.get_bytes(&url, fetcher.timeout).await {
                    Ok(bytes) => Some(bytes),
                    Err(e) => {
                        error!("Error downloading {}: {}", url, e);
                        None
                    }
                }
            }
        };

        FetchOutcome {
            attempted_url: url,
            content: content.filter(|bytes| !bytes.is_empty()),
        }
    }
}

// Downloads files from one CVSweb installation
pub struct FileFetcher {
    transport: Transport,
    cgi_base: String,
    timeout: Duration,
}

impl FileFetcher {
    pub fn new(transport: Transport, cgi_base: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            cgi_base: cgi_base.into(),
            timeout,
        }
    }

    // Runs the strategies in order until one returns content.
    //
    // If all of them fail, the outcome carries the last URL tried.
    pub async fn fetch(&self, repository_path: &str, revision: &str) -> FetchOutcome {
        let mut outcome = FetchOutcome {
            attempted_url: String::new(),
            content: None,
        };

        for strategy in FETCH_ORDER {
            outcome = strategy.attempt(self, repository_path, revision).await;
            if outcome.content.is_some() {
                break;
            }
        }

        outcome
    }
}

// Percent-encodes each segment of a repository path, keeping the slashes
//
// "dir/my file.c" -> "dir/my%20file.c"
fn quote_path(repository_path: &str) -> String {
    repository_path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MirrorConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MARKUP_PAGE: &str =
        "<html><body><hr noshade><pre>log</pre><hr noshade><pre>hello world</pre></body></html>";

    fn fetcher(server: &MockServer) -> FileFetcher {
        let config = MirrorConfig {
            request_delay: Duration::ZERO,
            ..MirrorConfig::default()
        };
        let transport = Transport::new(&config).unwrap();
        FileFetcher::new(
            transport,
            format!("{}/cgi-bin/cvsweb.cgi", server.uri()),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_quote_path_encodes_segments() {
        assert_eq!(quote_path("dir/my file+.c"), "dir/my%20file%2B.c");
        assert_eq!(quote_path("a/b/c.h"), "a/b/c.h");
    }

    #[test]
    fn test_markup_url_shape() {
        let url = FetchStrategy::Markup.url("http://host/cgi-bin/cvsweb.cgi/", "proj/a.txt", "1.3");
        assert_eq!(
            url,
            "http://host/cgi-bin/cvsweb.cgi/proj/a.txt?rev=1.3&content-type=text/x-cvsweb-markup"
        );
    }

    #[test]
    fn test_checkout_url_uses_raw_replay_variant() {
        let url = FetchStrategy::Checkout.url(
            "https://web.archive.org/web/20171010115113/http://oss.sgi.com/cgi-bin/cvsweb.cgi",
            "projects/x",
            "1.2",
        );
        assert_eq!(
            url,
            "https://web.archive.org/web/20171010115113if_/http://oss.sgi.com/cgi-bin/cvsweb.cgi/~checkout~/projects/x?rev=1.2"
        );
    }

    #[test]
    fn test_markup_url_is_not_rewritten() {
        let url = FetchStrategy::Markup.url(
            "https://web.archive.org/web/20171010115113/http://oss.sgi.com/cgi-bin/cvsweb.cgi",
            "projects/x",
            "1.2",
        );
        assert!(url.starts_with("https://web.archive.org/web/20171010115113/http://"));
    }

    #[tokio::test]
    async fn test_markup_wins_when_it_has_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/cvsweb.cgi/proj/a.txt"))
            .and(query_param("rev", "1.3"))
            .and(query_param("content-type", MARKUP_CONTENT_TYPE))
            .respond_with(ResponseTemplate::new(200).set_body_string(MARKUP_PAGE))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/cvsweb.cgi/~checkout~/proj/a.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("raw"))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = fetcher(&server).fetch("proj/a.txt", "1.3").await;
        assert_eq!(outcome.content, Some(b"hello world".to_vec()));
        assert!(outcome.attempted_url.contains("content-type=text/x-cvsweb-markup"));
    }

    #[tokio::test]
    async fn test_falls_back_to_checkout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/cvsweb.cgi/proj/a.txt"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>no body here</body></html>"),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/cvsweb.cgi/~checkout~/proj/a.txt"))
            .and(query_param("rev", "1.3"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"raw bytes\n".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = fetcher(&server).fetch("proj/a.txt", "1.3").await;
        assert_eq!(outcome.content, Some(b"raw bytes\n".to_vec()));
        assert!(outcome.attempted_url.contains("~checkout~"));
    }

    #[tokio::test]
    async fn test_empty_markup_body_falls_back_to_checkout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/cvsweb.cgi/proj/a.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><body><hr noshade><pre>log</pre><hr noshade><pre></pre><pre>footer</pre></body></html>",
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/cvsweb.cgi/~checkout~/proj/a.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("real body"))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = fetcher(&server).fetch("proj/a.txt", "1.3").await;
        assert_eq!(outcome.content, Some(b"real body".to_vec()));
    }

    #[tokio::test]
    async fn test_both_fail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let outcome = fetcher(&server).fetch("proj/a.txt", "1.3").await;
        assert_eq!(outcome.content, None);
        assert_eq!(
            outcome.attempted_url,
            format!("{}/cgi-bin/cvsweb.cgi/~checkout~/proj/a.txt?rev=1.3", server.uri())
        );
    }

    #[tokio::test]
    async fn test_empty_checkout_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let outcome = fetcher(&server).fetch("proj/empty", "1.1").await;
        assert_eq!(outcome.content, None);
    }
}
