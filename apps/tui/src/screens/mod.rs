//! TUI screen definitions.
//!
//! Each screen renders one [`ViewState`] variant and keeps its own cursor
//! or scroll state. Key handling returns a [`Nav`] for the app to apply.

mod article;
mod author_profile;
mod authors;
mod cover;

use std::fmt;

use crossterm::event::{KeyCode, KeyModifiers};
use folio_core::{Book, Links, ViewState};
use ratatui::prelude::*;

/// Screen identifiers, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScreenId {
    Cover,
    Authors,
    AuthorProfile,
    Article,
}

impl ScreenId {
    pub(crate) const ALL: [ScreenId; 4] = [
        ScreenId::Cover,
        ScreenId::Authors,
        ScreenId::AuthorProfile,
        ScreenId::Article,
    ];

    pub(crate) fn of(view: &ViewState) -> Self {
        match view {
            ViewState::Cover => Self::Cover,
            ViewState::AuthorList => Self::Authors,
            ViewState::AuthorProfile { .. } => Self::AuthorProfile,
            ViewState::Article { .. } => Self::Article,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cover => write!(f, "Cover"),
            Self::Authors => write!(f, "Authors"),
            Self::AuthorProfile => write!(f, "Author"),
            Self::Article => write!(f, "Article"),
        }
    }
}

/// What a key press asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Nav {
    Stay,
    Open(ViewState),
    Back,
}

/// Read-only data every screen draws from.
pub(crate) struct Context<'a> {
    pub book: &'a Book,
    pub links: &'a Links,
    pub loading: bool,
}

/// Per-screen state and behaviour.
pub(crate) struct Screens {
    authors: authors::AuthorsScreen,
    profile: author_profile::AuthorProfileScreen,
    article: article::ArticleScreen,
}

impl Screens {
    pub(crate) fn new() -> Self {
        Self {
            authors: authors::AuthorsScreen::new(),
            profile: author_profile::AuthorProfileScreen::new(),
            article: article::ArticleScreen::new(),
        }
    }

    /// Reset cursor state when a view is (re)entered.
    pub(crate) fn enter(&mut self, view: &ViewState) {
        match view {
            ViewState::AuthorProfile { .. } => self.profile.reset(),
            ViewState::Article { .. } => self.article.reset(),
            ViewState::Cover | ViewState::AuthorList => {}
        }
    }

    /// Whether the current screen has an active text input field.
    pub(crate) fn is_editing(&self, view: &ViewState) -> bool {
        matches!(view, ViewState::AuthorList) && self.authors.is_editing()
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, view: &ViewState, ctx: &Context<'_>) {
        match view {
            ViewState::Cover => cover::draw(f, area, ctx),
            ViewState::AuthorList => self.authors.draw(f, area, ctx),
            ViewState::AuthorProfile { author } => self.profile.draw(f, area, author, ctx),
            ViewState::Article { id } => self.article.draw(f, area, id, ctx),
        }
    }

    pub(crate) fn handle_key(
        &mut self,
        view: &ViewState,
        code: KeyCode,
        modifiers: KeyModifiers,
        ctx: &Context<'_>,
    ) -> Nav {
        match view {
            ViewState::Cover => cover::handle_key(code, ctx),
            ViewState::AuthorList => self.authors.handle_key(code, modifiers, ctx),
            ViewState::AuthorProfile { author } => self.profile.handle_key(code, author, ctx),
            ViewState::Article { id } => self.article.handle_key(code, id, ctx),
        }
    }
}
