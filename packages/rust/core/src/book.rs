//! Read model over the grouped feed.
//!
//! A [`Book`] is built once per fetch and never mutated afterwards; a
//! refresh builds a new one (see [`crate::pipeline::BookStore`]).

use serde::Serialize;

use folio_shared::{Article, AuthorGroup, DEFAULT_SALUTATION};

use crate::slug::to_slug;

/// The grouped feed plus lookups used by every front end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Book {
    groups: Vec<AuthorGroup>,
}

/// Per-author totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuthorStats {
    pub articles: usize,
    pub views: u64,
    pub comments: u64,
}

/// Author details gathered from the first article that carries each field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorProfile {
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub salutation: String,
    pub stats: AuthorStats,
}

impl Book {
    /// Wrap groups that are already in reading order.
    pub fn new(groups: Vec<AuthorGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[AuthorGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every article, in group order then reading order.
    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        self.groups.iter().flat_map(|g| g.articles.iter())
    }

    /// Flat article list, as the reader pages through it.
    pub fn flat(&self) -> Vec<&Article> {
        self.articles().collect()
    }

    pub fn total_articles(&self) -> usize {
        self.groups.iter().map(|g| g.articles.len()).sum()
    }

    /// Article by its `row-<n>` id.
    pub fn article(&self, id: &str) -> Option<&Article> {
        self.articles().find(|a| a.id == id)
    }

    /// Group containing an article.
    pub fn group_of(&self, article: &Article) -> Option<&AuthorGroup> {
        self.group(&article.author)
    }

    /// Group by exact author name.
    pub fn group(&self, author: &str) -> Option<&AuthorGroup> {
        self.groups.iter().find(|g| g.author == author)
    }

    /// Group whose author slug equals `slug`.
    pub fn group_by_slug(&self, slug: &str) -> Option<&AuthorGroup> {
        self.groups.iter().find(|g| to_slug(&g.author) == slug)
    }

    pub fn stats(group: &AuthorGroup) -> AuthorStats {
        AuthorStats {
            articles: group.articles.len(),
            views: group.total_views(),
            comments: group.total_comments(),
        }
    }

    /// Profile for a group: first non-empty avatar, job title, bio and
    /// salutation across its articles.
    pub fn profile(group: &AuthorGroup) -> AuthorProfile {
        fn first<'a>(
            group: &'a AuthorGroup,
            field: impl Fn(&'a Article) -> Option<&'a str>,
        ) -> Option<&'a str> {
            group
                .articles
                .iter()
                .filter_map(field)
                .find(|value| !value.is_empty())
        }

        AuthorProfile {
            author: group.author.clone(),
            avatar: first(group, |a| a.avatar.as_deref()).map(str::to_string),
            title: first(group, |a| a.author_title.as_deref()).map(str::to_string),
            bio: first(group, |a| a.author_bio.as_deref()).map(str::to_string),
            salutation: first(group, |a| Some(a.author_gen.as_str()))
                .unwrap_or(DEFAULT_SALUTATION)
                .to_string(),
            stats: Self::stats(group),
        }
    }

    /// Table of contents filtered by title or author.
    ///
    /// Groups left without articles are dropped. A blank query keeps
    /// everything.
    pub fn filter_toc(&self, query: &str) -> Vec<AuthorGroup> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.groups.clone();
        }

        self.groups
            .iter()
            .filter_map(|group| {
                let articles: Vec<Article> = group
                    .articles
                    .iter()
                    .filter(|a| {
                        a.title.to_lowercase().contains(&query)
                            || a.author.to_lowercase().contains(&query)
                    })
                    .cloned()
                    .collect();
                (!articles.is_empty()).then(|| AuthorGroup {
                    author: group.author.clone(),
                    articles,
                })
            })
            .collect()
    }

    /// Authors whose name or any job title contains the query.
    pub fn filter_authors(&self, query: &str) -> Vec<&AuthorGroup> {
        let query = query.trim().to_lowercase();
        self.groups
            .iter()
            .filter(|group| {
                query.is_empty()
                    || group.author.to_lowercase().contains(&query)
                    || group.articles.iter().any(|a| {
                        a.author_title
                            .as_deref()
                            .is_some_and(|t| t.to_lowercase().contains(&query))
                    })
            })
            .collect()
    }
}

impl From<Vec<AuthorGroup>> for Book {
    fn from(groups: Vec<AuthorGroup>) -> Self {
        Self::new(groups)
    }
}
