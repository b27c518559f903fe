//! Navigation state and its query-string form.
//!
//! Exactly one view is active at a time. A query string such as
//! `?id=row-3`, `?author=nguyen-van-a` or `?view=authors` selects it, and
//! [`to_query`] produces the canonical query for a view.

use folio_shared::{FolioError, Result};
use serde::{Deserialize, Serialize};

use crate::book::Book;
use crate::slug::to_slug;

/// The view a reader is looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Cover,
    AuthorList,
    AuthorProfile {
        author: String,
    },
    Article {
        id: String,
    },
}

/// Navigation parameters parsed from a query string.
///
/// Blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavParams {
    pub id: Option<String>,
    pub author: Option<String>,
    pub view: Option<String>,
}

impl NavParams {
    /// Parse `id`, `author` and `view` from a query string, with or without
    /// the leading `?`. Values are percent-decoded; the first occurrence of
    /// a key wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut params = Self::default();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "id" => &mut params.id,
                "author" => &mut params.author,
                "view" => &mut params.view,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        params
    }

    /// Parse the query component of a full URL.
    pub fn from_url(url: &url::Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }

    /// Parse a shared link: either a full URL or a bare query string.
    pub fn from_link(link: &str) -> Result<Self> {
        let link = link.trim();
        if !link.contains("://") {
            return Ok(Self::from_query(link));
        }
        let url = url::Url::parse(link)
            .map_err(|e| FolioError::parse(format!("invalid link '{link}': {e}")))?;
        Ok(Self::from_url(&url))
    }
}

/// Select the view for a set of parameters.
///
/// Precedence: a known article id, then an author (by slug, falling back to
/// a case-insensitive name match), then `view=authors`, then the cover. An
/// unknown id or author falls through to the next rule. An empty book always
/// shows the cover.
pub fn resolve(params: &NavParams, book: &Book) -> ViewState {
    if book.is_empty() {
        return ViewState::Cover;
    }

    if let Some(article) = params.id.as_deref().and_then(|id| book.article(id)) {
        return ViewState::Article {
            id: article.id.clone(),
        };
    }

    if let Some(author) = params.author.as_deref() {
        let lowered = author.to_lowercase();
        let group = book.group_by_slug(author).or_else(|| {
            book.groups()
                .iter()
                .find(|g| g.author.to_lowercase() == lowered)
        });
        if let Some(group) = group {
            return ViewState::AuthorProfile {
                author: group.author.clone(),
            };
        }
    }

    if params.view.as_deref() == Some("authors") {
        return ViewState::AuthorList;
    }

    ViewState::Cover
}

/// Whether a view still shows the same thing in `book`.
///
/// Authors and articles are checked by exact name and id. Going through
/// [`to_query`] would not do: two authors can share a slug.
pub fn is_available(state: &ViewState, book: &Book) -> bool {
    match state {
        ViewState::Cover => true,
        _ if book.is_empty() => false,
        ViewState::AuthorList => true,
        ViewState::AuthorProfile { author } => book.group(author).is_some(),
        ViewState::Article { id } => book.article(id).is_some(),
    }
}

/// Canonical query string for a view; the cover has none.
///
/// Authors are written as slugs, so a view whose author shares a slug with
/// another author does not resolve back to itself.
pub fn to_query(state: &ViewState) -> String {
    match state {
        ViewState::Cover => String::new(),
        ViewState::AuthorList => "?view=authors".to_string(),
        ViewState::AuthorProfile { author } => format!("?author={}", to_slug(author)),
        ViewState::Article { id } => {
            let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
            format!("?id={encoded}")
        }
    }
}
