//! Outbound links: discussion threads, permalinks and social sharing.

use folio_shared::{Article, LinksConfig};

use crate::routing::{ViewState, to_query};
use crate::slug::to_slug;

const FACEBOOK_SHARER: &str = "https://www.facebook.com/sharer/sharer.php";
const X_INTENT: &str = "https://x.com/intent/tweet";

/// Anchor of the comment box on a discussion page.
const COMMENT_ANCHOR: &str = "box_comment_vne";

/// Link builder bound to one site configuration.
#[derive(Debug, Clone)]
pub struct Links {
    discussion_base: String,
    site_name: String,
    book_url: Option<String>,
}

impl Links {
    pub fn new(config: &LinksConfig) -> Self {
        Self {
            discussion_base: config.discussion_base.trim_end_matches('/').to_string(),
            site_name: config.site_name.clone(),
            book_url: config
                .book_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        }
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    /// Deep link to the article's comment thread; `None` without an
    /// upstream `article_id`.
    pub fn discussion(&self, article: &Article) -> Option<String> {
        let article_id = article.article_id.as_deref()?;
        Some(format!(
            "{}/{}-{}.html#{COMMENT_ANCHOR}",
            self.discussion_base,
            to_slug(&article.title),
            article_id
        ))
    }

    /// Public URL of a view, when the book has a public page.
    pub fn permalink(&self, state: &ViewState) -> Option<String> {
        self.book_url
            .as_deref()
            .map(|base| format!("{base}{}", to_query(state)))
    }

    pub fn article_share_title(article: &Article) -> String {
        format!("{} - {}", article.title, article.author)
    }

    pub fn author_share_title(&self, author: &str) -> String {
        format!("Hồ sơ tác giả: {author} - {}", self.site_name)
    }

    /// Facebook share dialog for a page.
    pub fn facebook_share(page_url: &str) -> String {
        format!("{FACEBOOK_SHARER}?u={}", encode(page_url))
    }

    /// X (Twitter) share intent for a page.
    pub fn x_share(title: &str, page_url: &str) -> String {
        format!("{X_INTENT}?text={}&url={}", encode(title), encode(page_url))
    }
}

impl Default for Links {
    fn default() -> Self {
        Self::new(&LinksConfig::default())
    }
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
