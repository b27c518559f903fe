//! Feed ingestion: fetching the published spreadsheet and turning its rows
//! into [`Article`](folio_shared::Article)s.
//!
//! The fetcher never fails loudly. Transport errors and non-success statuses
//! are logged and surface as `None`, which the pipeline treats as an empty
//! feed.

mod columns;
pub mod normalize;
mod parser;

use std::time::Duration;

use folio_shared::{FeedSettings, FolioError, Result};
use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub use columns::{ColumnMap, Role, find_column};
pub use parser::{ParseOptions, parse_feed};

/// Maximum number of redirects to follow (published sheets redirect once).
const MAX_REDIRECTS: usize = 5;

/// User-Agent string for feed requests.
pub const USER_AGENT: &str = concat!("Folio/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Fetch options
// ---------------------------------------------------------------------------

/// Configuration for a feed fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// User-Agent header sent with the request.
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl From<&FeedSettings> for FetchOptions {
    fn from(settings: &FeedSettings) -> Self {
        Self {
            timeout_secs: settings.timeout_secs,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Fetch the raw feed text.
///
/// Every call hits the network; there is no retry and no cache. Any failure
/// is logged at `warn` and reported as `None`.
#[instrument(skip_all, fields(url = %url))]
pub async fn load(url: &Url, opts: &FetchOptions) -> Option<String> {
    let client = match build_client(opts) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "could not build feed client");
            return None;
        }
    };

    match fetch_text(&client, url).await {
        Ok(text) => {
            info!(bytes = text.len(), "feed fetched");
            Some(text)
        }
        Err(e) => {
            warn!(error = %e, "feed fetch failed");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a reqwest client for feed requests.
fn build_client(opts: &FetchOptions) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(opts.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));

    if let Some(secs) = opts.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder
        .build()
        .map_err(|e| FolioError::Network(format!("failed to build HTTP client: {e}")))
}

/// GET a URL and return its body as text, rejecting non-success statuses.
async fn fetch_text(client: &Client, url: &Url) -> Result<String> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| FolioError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FolioError::Network(format!("{url}: HTTP {status}")));
    }

    debug!(%status, length = ?response.content_length(), "feed response");

    response
        .text()
        .await
        .map_err(|e| FolioError::Network(format!("{url}: failed to read body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feed_url(server: &MockServer) -> Url {
        Url::parse(&format!("{}/pub", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn load_returns_body_on_success() {
        let server = MockServer::start().await;
        let body = std::fs::read_to_string("../../../fixtures/tsv/sample-feed.tsv")
            .expect("read tsv fixture");

        Mock::given(method("GET"))
            .and(path("/pub"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string(&body))
            .expect(1)
            .mount(&server)
            .await;

        let text = load(&feed_url(&server), &FetchOptions::default()).await;
        assert_eq!(text.as_deref(), Some(body.as_str()));

        let articles = parse_feed(&text.unwrap(), &ParseOptions::with_today("1/1/2025"));
        assert_eq!(articles.len(), 5);
    }

    #[tokio::test]
    async fn load_is_empty_on_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pub"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&server)
            .await;

        assert!(load(&feed_url(&server), &FetchOptions::default()).await.is_none());
    }

    #[tokio::test]
    async fn load_is_empty_on_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(load(&feed_url(&server), &FetchOptions::default()).await.is_none());
    }

    #[tokio::test]
    async fn load_is_empty_when_connection_refused() {
        let server = MockServer::start().await;
        let url = feed_url(&server);
        // Shut the server down so the port refuses connections.
        drop(server);

        assert!(load(&url, &FetchOptions::default()).await.is_none());
    }

    #[tokio::test]
    async fn load_respects_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("a\tb\n1\t2\n")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let opts = FetchOptions {
            timeout_secs: Some(1),
            ..FetchOptions::default()
        };
        assert!(load(&feed_url(&server), &opts).await.is_none());
    }

    #[tokio::test]
    async fn load_follows_redirects() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pub"))
            .respond_with(
                ResponseTemplate::new(307)
                    .insert_header("location", format!("{}/export", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/export"))
            .respond_with(ResponseTemplate::new(200).set_body_string("tác giả\ttên bài\nA\tB\n"))
            .mount(&server)
            .await;

        let text = load(&feed_url(&server), &FetchOptions::default()).await;
        assert_eq!(text.as_deref(), Some("tác giả\ttên bài\nA\tB\n"));
    }

    #[test]
    fn fetch_options_from_settings() {
        let settings = FeedSettings {
            url: Url::parse("https://example.com/feed.tsv").unwrap(),
            timeout_secs: Some(20),
        };
        let opts = FetchOptions::from(&settings);
        assert_eq!(opts.timeout_secs, Some(20));
        assert_eq!(opts.user_agent, USER_AGENT);
        assert!(FetchOptions::default().timeout_secs.is_none());
    }
}
