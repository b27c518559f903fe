//! Author list with incremental search.

use crossterm::event::{KeyCode, KeyModifiers};
use folio_core::{Book, ViewState};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use super::{Context, Nav};

pub(crate) struct AuthorsScreen {
    query: String,
    editing: bool,
    selected: usize,
}

impl AuthorsScreen {
    pub(crate) fn new() -> Self {
        Self {
            query: String::new(),
            editing: false,
            selected: 0,
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, ctx: &Context<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Search
                Constraint::Min(1),    // List
            ])
            .split(area);

        let search_style = if self.editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let search_text = if self.query.is_empty() && !self.editing {
            "Press / to search by name or job title".to_string()
        } else {
            self.query.clone()
        };
        let search = Paragraph::new(search_text).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search ")
                .border_style(search_style),
        );
        f.render_widget(search, chunks[0]);

        let groups = ctx.book.filter_authors(&self.query);
        if groups.is_empty() {
            let empty = Paragraph::new("No authors match.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" Authors "));
            f.render_widget(empty, chunks[1]);
            return;
        }

        let selected = self.selected.min(groups.len() - 1);
        let items: Vec<ListItem> = groups
            .iter()
            .enumerate()
            .map(|(i, group)| {
                let profile = Book::profile(group);
                let style = if i == selected {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let prefix = if i == selected { "▸ " } else { "  " };
                let title = profile
                    .title
                    .map(|t| format!("  · {t}"))
                    .unwrap_or_default();
                ListItem::new(format!(
                    "{prefix}{}  ({} articles){title}",
                    profile.author, profile.stats.articles
                ))
                .style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Authors ({}) ", groups.len())),
        );
        f.render_widget(list, chunks[1]);
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        _modifiers: KeyModifiers,
        ctx: &Context<'_>,
    ) -> Nav {
        if self.editing {
            match code {
                KeyCode::Esc | KeyCode::Enter => self.editing = false,
                KeyCode::Backspace => {
                    self.query.pop();
                    self.selected = 0;
                }
                KeyCode::Char(c) => {
                    self.query.push(c);
                    self.selected = 0;
                }
                _ => {}
            }
            return Nav::Stay;
        }

        let groups = ctx.book.filter_authors(&self.query);
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.min(groups.len().saturating_sub(1));
                self.selected = self.selected.saturating_sub(1);
                Nav::Stay
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < groups.len() {
                    self.selected += 1;
                }
                Nav::Stay
            }
            KeyCode::Char('/') => {
                self.editing = true;
                Nav::Stay
            }
            KeyCode::Enter => match groups.get(self.selected).or(groups.last()) {
                Some(group) => Nav::Open(ViewState::AuthorProfile {
                    author: group.author.clone(),
                }),
                None => Nav::Stay,
            },
            KeyCode::Esc => Nav::Back,
            _ => Nav::Stay,
        }
    }
}
