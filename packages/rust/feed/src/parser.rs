//! Tab-separated feed parser.
//!
//! Layout of the feed:
//! - Line 1: header row, one label per column
//! - Every further non-blank line: one article, cells separated by `\t`
//!
//! Column roles are detected from the header labels (see [`crate::columns`]).
//! Roles without a column fall back to fixed positions or placeholders, so a
//! drifting spreadsheet schema degrades content instead of failing.

use folio_shared::{
    ANONYMOUS_AUTHOR, ARTICLE_TITLE_PREFIX, Article, DEFAULT_SALUTATION, RawRecord, UNTITLED,
};
use tracing::{debug, instrument, trace};

use crate::columns::{ColumnMap, Role};
use crate::normalize::{date_prefix, parse_count, today_string, unquote};

/// Positional fallbacks used when a role has no header.
const AUTHOR_POSITION: usize = 1;
const TITLE_POSITION: usize = 2;
const CONTENT_POSITION: usize = 3;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Knobs for a parse run.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Date given to rows without a usable date cell.
    pub today: String,
}

impl ParseOptions {
    /// Use a fixed "today" (handy for reproducible output).
    pub fn with_today(today: impl Into<String>) -> Self {
        Self {
            today: today.into(),
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            today: today_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse raw feed text into articles, in row order.
///
/// Rows with fewer than two cells, and rows where both title and content
/// resolve to empty, are dropped without error.
#[instrument(skip_all, fields(bytes = text.len()))]
pub fn parse_feed(text: &str, opts: &ParseOptions) -> Vec<Article> {
    let rows: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    if rows.len() < 2 {
        debug!(rows = rows.len(), "feed has no data rows");
        return Vec::new();
    }

    let headers: Vec<String> = rows[0]
        .split('\t')
        .map(|h| h.trim().to_lowercase())
        .collect();
    let columns = ColumnMap::detect(&headers);

    for (role, idx) in columns.detected() {
        trace!(%role, column = idx, header = %headers[idx], "column detected");
    }

    let mut articles = Vec::with_capacity(rows.len() - 1);
    for (index, line) in rows.iter().enumerate().skip(1) {
        let row = Row::split(line, &columns);
        match row.into_article(index, &headers, opts) {
            Some(article) => articles.push(article),
            None => trace!(row = index, "row dropped"),
        }
    }

    debug!(
        rows = rows.len() - 1,
        articles = articles.len(),
        "feed parsed"
    );

    articles
}

/// One data line, split into cells.
struct Row<'a> {
    cells: Vec<&'a str>,
    columns: &'a ColumnMap,
}

impl<'a> Row<'a> {
    fn split(line: &'a str, columns: &'a ColumnMap) -> Self {
        Self {
            cells: line.split('\t').collect(),
            columns,
        }
    }

    /// Trimmed cell of a role's column; `None` when the role has no column.
    /// A detected column with no cell on this row reads as empty.
    fn role(&self, role: Role) -> Option<&'a str> {
        self.columns
            .get(role)
            .map(|idx| self.cells.get(idx).copied().map_or("", str::trim))
    }

    /// Non-empty trimmed cell at a fixed position.
    fn position(&self, idx: usize) -> Option<&'a str> {
        self.cells
            .get(idx)
            .copied()
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
    }

    /// Optional text field: detected and non-empty.
    fn text(&self, role: Role) -> Option<String> {
        self.role(role)
            .filter(|cell| !cell.is_empty())
            .map(str::to_string)
    }

    fn count(&self, role: Role) -> u64 {
        match self.role(role) {
            Some(cell) if !cell.is_empty() => parse_count(cell, 0),
            _ => 0,
        }
    }

    fn into_article(self, index: usize, headers: &[String], opts: &ParseOptions) -> Option<Article> {
        if self.cells.len() < 2 {
            return None;
        }

        let author = self
            .role(Role::Author)
            .or_else(|| self.position(AUTHOR_POSITION))
            .filter(|author| !author.is_empty())
            .unwrap_or(ANONYMOUS_AUTHOR);

        let title = match self.role(Role::Title) {
            Some(cell) => cell.to_string(),
            None => self
                .position(TITLE_POSITION)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{ARTICLE_TITLE_PREFIX} {index}")),
        };

        let content = self
            .role(Role::Content)
            .or_else(|| self.position(CONTENT_POSITION))
            .unwrap_or_default();

        if title.is_empty() && content.is_empty() {
            return None;
        }

        let avatar = self
            .role(Role::Avatar)
            .map(unquote)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        let published_date = self
            .role(Role::Date)
            .and_then(date_prefix)
            .map_or_else(|| opts.today.clone(), str::to_string);

        Some(Article {
            id: format!("row-{index}"),
            article_id: self.text(Role::ArticleId),
            author: author.to_string(),
            author_name: self.text(Role::AuthorName),
            author_gen: self
                .role(Role::Salutation)
                .unwrap_or(DEFAULT_SALUTATION)
                .to_string(),
            author_bio: self.text(Role::Biography),
            author_title: self.text(Role::JobTitle),
            avatar,
            title: if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title
            },
            content: content.to_string(),
            genre: self.text(Role::Genre),
            published_date,
            views: self.count(Role::Views),
            comments: self.count(Role::Comments),
            raw: RawRecord::from_row(headers, &self.cells),
        })
    }
}
