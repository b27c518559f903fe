//! Domain logic for Folio books.
//!
//! This crate turns parsed feed rows into a [`Book`]: author grouping and
//! ordering, slugs, navigation state, outbound links, reader helpers, and
//! the end-to-end load with its shared [`BookStore`].

pub mod book;
pub mod collate;
pub mod grouping;
pub mod links;
pub mod pipeline;
pub mod reader;
pub mod routing;
pub mod slug;

pub use book::{AuthorProfile, AuthorStats, Book};
pub use grouping::{group, parse};
pub use links::Links;
pub use pipeline::{
    BookStore, LoadSummary, ProgressReporter, RefreshTicket, SilentProgress, book_from_text,
    load_book,
};
pub use routing::{NavParams, ViewState, is_available, resolve, to_query};
pub use slug::to_slug;

// Feed-level options are part of this crate's public API.
pub use folio_feed::{FetchOptions, ParseOptions};
