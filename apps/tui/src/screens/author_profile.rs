//! Author profile: bio, totals, share line and the author's articles.

use crossterm::event::KeyCode;
use folio_core::{Book, ViewState, reader};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use super::{Context, Nav};

pub(crate) struct AuthorProfileScreen {
    selected: usize,
}

impl AuthorProfileScreen {
    pub(crate) fn new() -> Self {
        Self { selected: 0 }
    }

    pub(crate) fn reset(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, author: &str, ctx: &Context<'_>) {
        let Some(group) = ctx.book.group(author) else {
            let missing = Paragraph::new(format!("{author} is no longer in the book."))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(missing, area);
            return;
        };
        let profile = Book::profile(group);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .margin(1)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        // Left page: who the author is
        let mut lines = vec![
            Line::from(profile.author.clone()).style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(title) = &profile.title {
            lines.push(Line::from(title.clone()).style(Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::from(""));

        match &profile.bio {
            Some(bio) => {
                for paragraph in reader::plain_paragraphs(bio) {
                    lines.push(Line::from(paragraph).style(Style::default().italic()));
                    lines.push(Line::from(""));
                }
            }
            None => lines.push(
                Line::from("Author details are being updated...")
                    .style(Style::default().fg(Color::DarkGray).italic()),
            ),
        }

        lines.push(Line::from(format!(
            "{} articles · {} views · {} comments",
            profile.stats.articles, profile.stats.views, profile.stats.comments
        )));
        lines.push(Line::from(""));
        lines.push(
            Line::from(ctx.links.author_share_title(&profile.author))
                .style(Style::default().fg(Color::DarkGray)),
        );
        let state = ViewState::AuthorProfile {
            author: profile.author.clone(),
        };
        if let Some(permalink) = ctx.links.permalink(&state) {
            lines.push(Line::from(permalink).style(Style::default().fg(Color::Blue)));
        }

        let left = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", reader::salutation(&profile.salutation))),
            );
        f.render_widget(left, chunks[0]);

        // Right page: the author's articles
        let selected = self.selected.min(group.articles.len().saturating_sub(1));
        let items: Vec<ListItem> = group
            .articles
            .iter()
            .enumerate()
            .map(|(i, article)| {
                let style = if i == selected {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let prefix = if i == selected { "▸ " } else { "  " };
                ListItem::new(vec![
                    Line::from(format!("{prefix}{}", article.title)),
                    Line::from(format!(
                        "    {} · {} comments",
                        article.published_date, article.comments
                    ))
                    .style(Style::default().fg(Color::DarkGray)),
                ])
                .style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Articles "),
        );
        f.render_widget(list, chunks[1]);
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, author: &str, ctx: &Context<'_>) -> Nav {
        let Some(group) = ctx.book.group(author) else {
            return match code {
                KeyCode::Esc => Nav::Back,
                _ => Nav::Stay,
            };
        };

        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                Nav::Stay
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < group.articles.len() {
                    self.selected += 1;
                }
                Nav::Stay
            }
            KeyCode::Enter => match group.articles.get(self.selected).or(group.articles.last()) {
                Some(article) => Nav::Open(ViewState::Article {
                    id: article.id.clone(),
                }),
                None => Nav::Stay,
            },
            KeyCode::Esc => Nav::Back,
            _ => Nav::Stay,
        }
    }
}
