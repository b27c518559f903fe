//! Core TUI application state and event loop.

use std::io;
use std::mem;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use folio_core::pipeline::{LoadSummary, SilentProgress};
use folio_core::{
    Book, BookStore, FetchOptions, Links, NavParams, ParseOptions, ViewState, is_available,
    resolve, to_query,
};
use folio_shared::FeedSettings;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use tokio::runtime::Handle;
use tracing::debug;

use crate::screens::{Context, Nav, ScreenId, Screens};
use crate::widgets::status_bar;

/// Result of a background load, sent back to the event loop.
enum LoadEvent {
    /// The refresh committed its book.
    Committed(LoadSummary),
    /// A newer refresh started first; this result was dropped.
    Superseded,
}

/// Application state.
pub(crate) struct App {
    runtime: Handle,
    settings: FeedSettings,
    links: Links,
    store: Arc<BookStore>,
    /// Snapshot the screens draw from.
    book: Arc<Book>,
    /// Current view and the views to return to on Esc.
    view: ViewState,
    history: Vec<ViewState>,
    /// View requested on the command line, applied after the first load.
    pending_link: Option<NavParams>,
    screens: Screens,
    loading: bool,
    events_tx: Sender<LoadEvent>,
    events_rx: Receiver<LoadEvent>,
    /// Whether the app should quit.
    should_quit: bool,
    /// Status message shown in bottom bar.
    status: String,
    /// Whether help overlay is visible.
    show_help: bool,
}

impl App {
    fn new(runtime: Handle, settings: FeedSettings, links: Links, link: Option<NavParams>) -> Self {
        let store = Arc::new(BookStore::default());
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            runtime,
            settings,
            links,
            book: store.snapshot(),
            store,
            view: ViewState::Cover,
            history: Vec::new(),
            pending_link: link,
            screens: Screens::new(),
            loading: false,
            events_tx,
            events_rx,
            should_quit: false,
            status: "Ready · press ? for help".to_string(),
            show_help: false,
        }
    }

    /// Start a background fetch. Overlapping refreshes are allowed; the
    /// store keeps only the newest.
    fn refresh(&mut self) {
        let store = Arc::clone(&self.store);
        let url = self.settings.url.clone();
        let fetch = FetchOptions::from(&self.settings);
        let tx = self.events_tx.clone();

        self.loading = true;
        self.status = "Loading feed...".to_string();

        self.runtime.spawn(async move {
            let outcome = store
                .refresh(&url, &fetch, &ParseOptions::default(), &SilentProgress)
                .await;
            let event = match outcome {
                Some(summary) => LoadEvent::Committed(summary),
                None => LoadEvent::Superseded,
            };
            // The receiver is gone only when the app is shutting down.
            let _ = tx.send(event);
        });
    }

    fn poll_loads(&mut self) {
        loop {
            match self.events_rx.try_recv() {
                Ok(LoadEvent::Committed(summary)) => self.on_loaded(summary),
                Ok(LoadEvent::Superseded) => debug!("refresh superseded"),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }

    fn on_loaded(&mut self, summary: LoadSummary) {
        self.loading = false;
        self.book = self.store.snapshot();

        // Views that vanished with the refresh fall back to the cover.
        if let Some(params) = self.pending_link.take() {
            self.view = resolve(&params, &self.book);
        } else if !is_available(&self.view, &self.book) {
            self.view = ViewState::Cover;
        }
        let book = &self.book;
        self.history.retain(|v| is_available(v, book));
        self.screens.enter(&self.view);

        self.status = if summary.fetched {
            format!(
                "Loaded {} articles by {} authors in {:.1}s",
                summary.articles,
                summary.authors,
                summary.elapsed.as_secs_f64()
            )
        } else {
            "Feed unavailable · press r to retry".to_string()
        };
    }

    fn navigate(&mut self, nav: Nav) {
        match nav {
            Nav::Stay => return,
            Nav::Open(view) if view == self.view => return,
            Nav::Open(view) => {
                let previous = mem::replace(&mut self.view, view);
                // Paging between articles replaces rather than stacks.
                let paging = matches!(
                    (&previous, &self.view),
                    (ViewState::Article { .. }, ViewState::Article { .. })
                );
                if !paging {
                    self.history.push(previous);
                }
            }
            Nav::Back => {
                self.view = self.history.pop().unwrap_or_default();
            }
        }
        self.screens.enter(&self.view);
        self.status = self.location();
    }

    /// Where the reader is, as a link.
    fn location(&self) -> String {
        self.links
            .permalink(&self.view)
            .unwrap_or_else(|| match to_query(&self.view) {
                q if q.is_empty() => "Cover".to_string(),
                q => q,
            })
    }

    fn context(&self) -> Context<'_> {
        Context {
            book: &self.book,
            links: &self.links,
            loading: self.loading,
        }
    }
}

/// Entry point: sets up terminal, runs event loop, restores terminal.
pub(crate) fn run(
    runtime: Handle,
    settings: FeedSettings,
    links: Links,
    link: Option<NavParams>,
) -> Result<()> {
    // Setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let mut app = App::new(runtime, settings, links, link);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    app.refresh();

    loop {
        app.poll_loads();
        terminal.draw(|f| draw(f, app))?;

        // Poll for events with 100ms timeout for responsive UI
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key.code, key.modifiers);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let editing = app.screens.is_editing(&app.view);

    // Global keybindings (always active)
    match code {
        KeyCode::Char('q') | KeyCode::Char('c')
            if modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('q') if !editing => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') if !editing => {
            app.show_help = !app.show_help;
            return;
        }
        KeyCode::Char('r') if !editing => {
            app.refresh();
            return;
        }
        _ => {}
    }

    // If help is showing, consume any key to dismiss
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Delegate to current screen
    let view = app.view.clone();
    let nav = {
        let ctx = Context {
            book: &app.book,
            links: &app.links,
            loading: app.loading,
        };
        app.screens.handle_key(&view, code, modifiers, &ctx)
    };
    app.navigate(nav);
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    // Tab bar
    let tab_titles: Vec<Line> = ScreenId::ALL
        .iter()
        .map(|s| Line::from(format!("{s}")))
        .collect();

    let tabs = Tabs::new(tab_titles)
        .block(Block::default().borders(Borders::ALL).title(" Folio "))
        .select(ScreenId::of(&app.view).index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");

    f.render_widget(tabs, chunks[0]);

    // Content area: delegate to screen
    let ctx = app.context();
    app.screens.draw(f, chunks[1], &app.view, &ctx);

    // Status bar
    let hints = key_hints(&app.view);
    let bar = status_bar(&app.status, hints);
    f.render_widget(bar, chunks[2]);

    // Help overlay
    if app.show_help {
        draw_help_overlay(f);
    }
}

fn key_hints(view: &ViewState) -> &'static str {
    match view {
        ViewState::Cover => "Enter authors · → read · r refresh · q quit",
        ViewState::AuthorList => "↑/↓ select · Enter open · / search · Esc back",
        ViewState::AuthorProfile { .. } => "↑/↓ select · Enter read · Esc back",
        ViewState::Article { .. } => "←/→ page · ↑/↓ scroll · a author · Esc back",
    }
}

fn draw_help_overlay(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());

    let help_text = vec![
        Line::from("Keybindings").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  r            Refresh the feed"),
        Line::from("  ?            Toggle this help"),
        Line::from("  q / Ctrl-C   Quit"),
        Line::from(""),
        Line::from("Reading:").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  Enter        Open"),
        Line::from("  Esc          Back"),
        Line::from("  ↑/↓          Select / scroll"),
        Line::from("  ←/→          Previous / next article"),
        Line::from("  /            Search authors"),
        Line::from("  a            Author of the open article"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help · press any key to close ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    // Clear background
    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(help, area);
}

/// Create a centered rectangle with percentage width and height.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
