//! Folio TUI: a terminal reader for the article book.
//!
//! Cover, author list, author profile and article pages, built with
//! `ratatui` + `crossterm`. The feed loads in the background.

mod app;
mod screens;
mod widgets;

use clap::Parser;
use color_eyre::eyre::Result;
use folio_core::{Links, NavParams};
use folio_shared::{FeedSettings, load_config};

/// Terminal reader for a Folio book.
#[derive(Parser)]
#[command(name = "folio-tui", version, about, long_about = None)]
struct Args {
    /// Feed URL (overrides the config file).
    #[arg(long, env = "FOLIO_FEED_URL")]
    url: Option<String>,

    /// Request timeout in seconds (overrides the config file).
    #[arg(long)]
    timeout: Option<u64>,

    /// Open this view once the book loads: a shared link or a query such
    /// as "?id=row-3".
    link: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config = load_config()?;
    let settings = FeedSettings::resolve(&config, args.url.as_deref(), args.timeout)?;
    let links = Links::new(&config.links);
    let link = args.link.as_deref().map(NavParams::from_link).transpose()?;

    let runtime = tokio::runtime::Runtime::new()?;
    app::run(runtime.handle().clone(), settings, links, link)
}
