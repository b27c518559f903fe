//! End-to-end load: feed URL → fetch → parse → group → [`Book`].
//!
//! Loading never fails. A feed that cannot be fetched yields an empty book,
//! which front ends show as the bare cover.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};
use url::Url;

use folio_feed::{FetchOptions, ParseOptions};

use crate::book::Book;
use crate::grouping;

/// Outcome of a load, for status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub authors: usize,
    pub articles: usize,
    /// Whether the fetch produced any text at all.
    pub fetched: bool,
    pub elapsed: Duration,
}

/// Progress callback for reporting load status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the load completes.
    fn done(&self, summary: &LoadSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _summary: &LoadSummary) {}
}

/// Fetch the feed and build a book from it.
#[instrument(skip_all, fields(url = %url))]
pub async fn load_book(
    url: &Url,
    fetch: &FetchOptions,
    parse: &ParseOptions,
    progress: &dyn ProgressReporter,
) -> (Book, LoadSummary) {
    let start = Instant::now();

    progress.phase("Fetching feed");
    let text = folio_feed::load(url, fetch).await;
    let fetched = text.is_some();

    progress.phase("Building book");
    let book = book_from_text(text.as_deref().unwrap_or_default(), parse);

    let summary = LoadSummary {
        authors: book.groups().len(),
        articles: book.total_articles(),
        fetched,
        elapsed: start.elapsed(),
    };

    info!(
        authors = summary.authors,
        articles = summary.articles,
        fetched,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "book loaded"
    );
    progress.done(&summary);

    (book, summary)
}

/// Parse and group already-fetched feed text.
pub fn book_from_text(text: &str, parse: &ParseOptions) -> Book {
    Book::new(grouping::parse(text, parse))
}

// ---------------------------------------------------------------------------
// BookStore
// ---------------------------------------------------------------------------

/// Ticket for one refresh, handed out by [`BookStore::begin_refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

/// Shared holder of the current book.
///
/// Readers clone the `Arc` and keep their snapshot for as long as they like.
/// A refresh replaces the whole book at once. When refreshes overlap, only
/// the most recently started one may commit its result.
#[derive(Debug, Default)]
pub struct BookStore {
    current: RwLock<Arc<Book>>,
    generation: AtomicU64,
}

impl BookStore {
    pub fn new(book: Book) -> Self {
        Self {
            current: RwLock::new(Arc::new(book)),
            generation: AtomicU64::new(0),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<Book> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Start a refresh. Any ticket issued earlier becomes stale.
    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Install a refreshed book if its ticket is still the newest.
    ///
    /// Returns `false` and drops the book when a newer refresh has started.
    pub fn commit(&self, ticket: RefreshTicket, book: Book) -> bool {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::SeqCst) != ticket.0 {
            debug!(ticket = ticket.0, "discarding stale refresh");
            return false;
        }
        *guard = Arc::new(book);
        true
    }

    /// Fetch and commit under a fresh ticket.
    pub async fn refresh(
        &self,
        url: &Url,
        fetch: &FetchOptions,
        parse: &ParseOptions,
        progress: &dyn ProgressReporter,
    ) -> Option<LoadSummary> {
        let ticket = self.begin_refresh();
        let (book, summary) = load_book(url, fetch, parse, progress).await;
        self.commit(ticket, book).then_some(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::routing::{NavParams, ViewState, resolve};

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<String>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, name: &str) {
            self.phases.lock().unwrap().push(name.to_string());
        }
        fn done(&self, _summary: &LoadSummary) {
            self.phases.lock().unwrap().push("done".to_string());
        }
    }

    fn opts() -> ParseOptions {
        ParseOptions::with_today("1/1/2025")
    }

    async fn serve(body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn load_book_end_to_end() {
        let body = std::fs::read_to_string("../../../fixtures/tsv/sample-feed.tsv")
            .expect("read fixture");
        let server = serve(&body).await;
        let url = Url::parse(&server.uri()).unwrap();
        let progress = RecordingProgress::default();

        let (book, summary) = load_book(&url, &FetchOptions::default(), &opts(), &progress).await;

        assert!(summary.fetched);
        assert_eq!(summary.articles, 5);
        assert_eq!(summary.authors, 4);
        assert_eq!(
            *progress.phases.lock().unwrap(),
            vec!["Fetching feed", "Building book", "done"]
        );

        let group = book.group("Nguyễn Văn A").unwrap();
        assert_eq!(group.articles[0].title, "Thành phố của những người trẻ");

        let view = resolve(&NavParams::from_query("?author=tran-c"), &book);
        assert_eq!(view, ViewState::AuthorProfile { author: "Trần C".into() });
    }

    #[tokio::test]
    async fn failed_fetch_gives_empty_book() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let url = Url::parse(&server.uri()).unwrap();

        let (book, summary) =
            load_book(&url, &FetchOptions::default(), &opts(), &SilentProgress).await;
        assert!(book.is_empty());
        assert!(!summary.fetched);
        assert_eq!(resolve(&NavParams::default(), &book), ViewState::Cover);
    }

    #[test]
    fn stale_refresh_is_discarded() {
        let store = BookStore::default();
        let first = store.begin_refresh();
        let second = store.begin_refresh();

        let newer = book_from_text("Tác giả\tTên bài\nB\tMới\n", &opts());
        let older = book_from_text("Tác giả\tTên bài\nA\tCũ\n", &opts());

        assert!(store.commit(second, newer));
        assert!(!store.commit(first, older));
        assert_eq!(store.snapshot().groups()[0].author, "B");
    }

    #[test]
    fn readers_keep_their_snapshot() {
        let store = BookStore::new(book_from_text("Tác giả\tTên bài\nA\tMột\n", &opts()));
        let before = store.snapshot();

        let ticket = store.begin_refresh();
        assert!(store.commit(ticket, Book::default()));

        assert_eq!(before.total_articles(), 1);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn refresh_commits_latest_result() {
        let server = serve("Tác giả\tTên bài\nA\tMột\nB\tHai\n").await;
        let url = Url::parse(&server.uri()).unwrap();
        let store = BookStore::default();

        let summary = store
            .refresh(&url, &FetchOptions::default(), &opts(), &SilentProgress)
            .await
            .expect("only refresh in flight");
        assert_eq!(summary.authors, 2);
        assert_eq!(store.snapshot().total_articles(), 2);
    }
}
