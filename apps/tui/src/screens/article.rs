//! Article page with previous/next paging over the whole book.

use crossterm::event::KeyCode;
use folio_core::{Links, ViewState, reader};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::{Context, Nav};

/// Lines moved by PageUp/PageDown.
const PAGE_STEP: u16 = 10;

pub(crate) struct ArticleScreen {
    scroll: u16,
}

impl ArticleScreen {
    pub(crate) fn new() -> Self {
        Self { scroll: 0 }
    }

    pub(crate) fn reset(&mut self) {
        self.scroll = 0;
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, id: &str, ctx: &Context<'_>) {
        let (Some(article), Some(page)) = (ctx.book.article(id), reader::page(ctx.book, id)) else {
            let missing = Paragraph::new(format!("Article {id} is no longer in the book."))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(missing, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Body
                Constraint::Length(3), // Footer
            ])
            .split(area);

        let mut lines = vec![
            Line::from(article.title.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
            Line::from(format!(
                "{} · {} · {} views · {} comments",
                article.author, article.published_date, article.views, article.comments
            ))
            .style(Style::default().fg(Color::DarkGray)),
        ];
        if let Some(genre) = &article.genre {
            lines.push(Line::from(genre.to_uppercase()).style(Style::default().fg(Color::Magenta)));
        }
        lines.push(Line::from(""));

        let body = reader::plain_paragraphs(&article.content);
        if body.is_empty() {
            lines.push(Line::from("(no content)").style(Style::default().fg(Color::DarkGray)));
        }
        for paragraph in body {
            lines.push(Line::from(paragraph));
            lines.push(Line::from(""));
        }

        if let Some(url) = ctx.links.discussion(article) {
            lines.push(Line::from(format!("Discussion: {url}")).style(Style::default().fg(Color::Blue)));
        }
        let state = ViewState::Article {
            id: article.id.clone(),
        };
        if let Some(permalink) = ctx.links.permalink(&state) {
            lines.push(
                Line::from(format!(
                    "Share: {} ({permalink})",
                    Links::article_share_title(article)
                ))
                .style(Style::default().fg(Color::DarkGray)),
            );
        }

        let text = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", article.author)),
            );
        f.render_widget(text, chunks[0]);

        let prev = if page.previous.is_some() { "← previous" } else { "" };
        let next = if page.next.is_some() { "next →" } else { "" };
        let footer = Paragraph::new(format!("{prev}    {}    {next}", page.position()))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(footer, chunks[1]);
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, id: &str, ctx: &Context<'_>) -> Nav {
        let Some(page) = reader::page(ctx.book, id) else {
            return match code {
                KeyCode::Esc => Nav::Back,
                _ => Nav::Stay,
            };
        };

        let open = |target: Option<&folio_shared::Article>| match target {
            Some(article) => Nav::Open(ViewState::Article {
                id: article.id.clone(),
            }),
            None => Nav::Stay,
        };

        match code {
            KeyCode::Left | KeyCode::Char('h') => open(page.previous),
            KeyCode::Right | KeyCode::Char('l') => open(page.next),
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                Nav::Stay
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                Nav::Stay
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(PAGE_STEP);
                Nav::Stay
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(PAGE_STEP);
                Nav::Stay
            }
            KeyCode::Char('a') => match ctx.book.article(id) {
                Some(article) => Nav::Open(ViewState::AuthorProfile {
                    author: article.author.clone(),
                }),
                None => Nav::Stay,
            },
            KeyCode::Esc => Nav::Back,
            _ => Nav::Stay,
        }
    }
}
