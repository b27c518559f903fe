//! Shared types, error model, and configuration for Folio.
//!
//! This crate is the foundation depended on by all other Folio crates.
//! It provides:
//! - [`FolioError`], the unified error type
//! - Domain types ([`RawRecord`], [`Article`], [`AuthorGroup`])
//! - Configuration ([`AppConfig`], [`FeedSettings`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_FEED_URL, FeedConfig, FeedSettings, LinksConfig, config_dir,
    config_file_path, init_config, init_config_in, load_config, load_config_from, parse_feed_url,
};
pub use error::{FolioError, Result};
pub use types::{
    ANONYMOUS_AUTHOR, ARTICLE_TITLE_PREFIX, Article, AuthorGroup, DEFAULT_SALUTATION, RawRecord,
    UNTITLED,
};
