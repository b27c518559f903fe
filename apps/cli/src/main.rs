//! Folio CLI: read a published article feed as a digital book.
//!
//! Fetches the feed, groups it by author, and prints the table of contents,
//! author list, single articles, or the view a query string selects.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
