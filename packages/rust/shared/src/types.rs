//! Core domain types for a Folio book.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Author placeholder used when a row names nobody ("anonymous").
pub const ANONYMOUS_AUTHOR: &str = "Khuyết danh";

/// Salutation used when the feed carries no salutation column ("Mr./Ms.").
pub const DEFAULT_SALUTATION: &str = "Ông/Bà";

/// Title given to a row that is kept for its content alone ("Untitled").
pub const UNTITLED: &str = "Không tiêu đề";

/// Prefix of the positional title fallback, followed by the row number.
pub const ARTICLE_TITLE_PREFIX: &str = "Bài viết";

// ---------------------------------------------------------------------------
// RawRecord
// ---------------------------------------------------------------------------

/// Every column of one feed row, keyed by lower-cased header.
///
/// Missing cells are stored as empty strings. A header that appears twice
/// keeps the value of its right-most column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(BTreeMap<String, String>);

impl RawRecord {
    /// Zip header cells with row cells.
    pub fn from_row(headers: &[String], cells: &[&str]) -> Self {
        let map = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let value = cells.get(idx).map(|c| c.trim()).unwrap_or_default();
                (header.clone(), value.to_string())
            })
            .collect();
        Self(map)
    }

    /// Cell value for a lower-cased header.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.0.get(header).map(String::as_str)
    }

    /// Number of distinct headers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(header, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Article
// ---------------------------------------------------------------------------

/// One normalized feed row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Synthetic identifier (`row-<n>`), stable only within one fetch.
    pub id: String,
    /// Upstream content identifier, used for discussion deep links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_id: Option<String>,
    /// Display name; never empty.
    pub author: String,
    /// Canonical author name, when the feed has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    /// Salutation / gender hint.
    pub author_gen: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_bio: Option<String>,
    /// Job title or role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Never empty.
    pub title: String,
    /// Body text; may be empty.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Day-granularity date as written in the feed (`d/m/yyyy`).
    pub published_date: String,
    pub views: u64,
    pub comments: u64,
    /// The untouched source row.
    pub raw: RawRecord,
}

// ---------------------------------------------------------------------------
// AuthorGroup
// ---------------------------------------------------------------------------

/// All articles by one author, already in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorGroup {
    /// Exact author string shared by every article in the group.
    pub author: String,
    pub articles: Vec<Article>,
}

impl AuthorGroup {
    /// Sum of views across the group.
    pub fn total_views(&self) -> u64 {
        self.articles.iter().map(|a| a.views).sum()
    }

    /// Sum of comments across the group.
    pub fn total_comments(&self) -> u64 {
        self.articles.iter().map(|a| a.comments).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str, views: u64, comments: u64) -> Article {
        Article {
            id: id.into(),
            article_id: None,
            author: "Nguyễn Văn A".into(),
            author_name: None,
            author_gen: DEFAULT_SALUTATION.into(),
            author_bio: None,
            author_title: None,
            avatar: None,
            title: format!("Title {id}"),
            content: String::new(),
            genre: None,
            published_date: "1/1/2025".into(),
            views,
            comments,
            raw: RawRecord::default(),
        }
    }

    #[test]
    fn raw_record_fills_missing_cells() {
        let headers = vec!["tác giả".to_string(), "tên bài".to_string(), "view".to_string()];
        let raw = RawRecord::from_row(&headers, &[" Nguyễn Văn A ", "Bài một"]);
        assert_eq!(raw.len(), 3);
        assert_eq!(raw.get("tác giả"), Some("Nguyễn Văn A"));
        assert_eq!(raw.get("view"), Some(""));
        assert_eq!(raw.get("missing"), None);
    }

    #[test]
    fn raw_record_duplicate_header_keeps_last() {
        let headers = vec!["id".to_string(), "id".to_string()];
        let raw = RawRecord::from_row(&headers, &["first", "second"]);
        assert_eq!(raw.len(), 1);
        assert_eq!(raw.get("id"), Some("second"));
    }

    #[test]
    fn group_totals() {
        let group = AuthorGroup {
            author: "Nguyễn Văn A".into(),
            articles: vec![article("row-1", 10, 2), article("row-2", 5, 1)],
        };
        assert_eq!(group.total_views(), 15);
        assert_eq!(group.total_comments(), 3);
    }

    #[test]
    fn article_serialization_skips_empty_options() {
        let json = serde_json::to_value(article("row-1", 1, 0)).expect("serialize");
        assert!(json.get("genre").is_none());
        assert_eq!(json["id"], "row-1");
        assert_eq!(json["author_gen"], DEFAULT_SALUTATION);
    }

    #[test]
    fn groups_fixture_validates() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/groups.fixture.json")
            .expect("read fixture");
        let parsed: Vec<AuthorGroup> =
            serde_json::from_str(&fixture).expect("deserialize fixture groups");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].author, "Lê Thị B");
        assert_eq!(parsed[1].articles.len(), 2);
        assert_eq!(parsed[1].articles[0].raw.get("view"), Some("1.500"));
    }
}
