//! Cover page.

use crossterm::event::KeyCode;
use folio_core::ViewState;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::{Context, Nav};

pub(crate) fn draw(f: &mut Frame, area: Rect, ctx: &Context<'_>) {
    let book = ctx.book;

    let mut lines = vec![
        Line::from(""),
        Line::from(ctx.links.site_name().to_string()).style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from("Digital book").style(Style::default().fg(Color::DarkGray)),
        Line::from(""),
    ];

    if ctx.loading && book.is_empty() {
        lines.push(Line::from("Loading feed..."));
    } else if book.is_empty() {
        lines.push(Line::from("No articles yet. Press 'r' to try again."));
    } else {
        lines.push(Line::from(format!(
            "{} authors · {} articles",
            book.groups().len(),
            book.total_articles()
        )));
        lines.push(Line::from(""));
        lines.push(
            Line::from("Enter: authors · →: start reading")
                .style(Style::default().fg(Color::DarkGray)),
        );
    }

    let cover = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(cover, area);
}

pub(crate) fn handle_key(code: KeyCode, ctx: &Context<'_>) -> Nav {
    match code {
        KeyCode::Enter if !ctx.book.is_empty() => Nav::Open(ViewState::AuthorList),
        KeyCode::Right => match ctx.book.articles().next() {
            Some(first) => Nav::Open(ViewState::Article {
                id: first.id.clone(),
            }),
            None => Nav::Stay,
        },
        _ => Nav::Stay,
    }
}
