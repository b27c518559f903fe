//! Reusable TUI widgets.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Bottom status bar: message on the left, key hints on the right.
pub(crate) fn status_bar<'a>(msg: &'a str, hints: &'a str) -> Paragraph<'a> {
    Paragraph::new(Line::from(vec![
        Span::raw(format!(" {msg}")),
        Span::raw("  │  "),
        Span::styled(hints, Style::default().fg(Color::Gray)),
    ]))
    .style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White),
    )
}
