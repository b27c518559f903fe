//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use folio_core::pipeline::{LoadSummary, ProgressReporter};
use folio_core::{
    Book, FetchOptions, Links, NavParams, ParseOptions, ViewState, load_book, reader, resolve,
    to_query,
};
use folio_shared::{AppConfig, Article, FeedSettings, FolioError, init_config, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Folio: read a published article feed as a digital book.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Fetch a published spreadsheet of articles and read it as a book, grouped by author.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Feed URL (overrides the config file).
    #[arg(long, env = "FOLIO_FEED_URL", global = true)]
    pub url: Option<String>,

    /// Request timeout in seconds (overrides the config file).
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch the feed and summarize the book.
    Fetch {
        /// Print the grouped book as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Print the table of contents.
    Toc {
        /// Keep only articles whose title or author contains this text.
        #[arg(short, long)]
        query: Option<String>,
    },

    /// List authors with their totals.
    Authors {
        /// Keep only authors whose name or job title contains this text.
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Print one article page.
    Show {
        /// Article id (e.g. row-3).
        id: String,
    },

    /// Show which view a link selects (e.g. "?author=nguyen-van-a").
    Resolve {
        /// Full URL, or a query string with or without the leading '?'.
        query: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init {
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so command
/// output stays pipeable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "folio=info",
        1 => "folio=debug",
        _ => "folio=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let Cli {
        url,
        timeout,
        command,
        ..
    } = cli;
    let url = url.as_deref();

    match command {
        Command::Fetch { json } => cmd_fetch(&Context::load(url, timeout)?, json).await,
        Command::Toc { query } => cmd_toc(&Context::load(url, timeout)?, query.as_deref()).await,
        Command::Authors { query } => {
            cmd_authors(&Context::load(url, timeout)?, query.as_deref()).await
        }
        Command::Show { id } => cmd_show(&Context::load(url, timeout)?, &id).await,
        Command::Resolve { query } => cmd_resolve(&Context::load(url, timeout)?, &query).await,
        Command::Config { action } => match action {
            ConfigAction::Init { force } => cmd_config_init(force).await,
            ConfigAction::Show => cmd_config_show(url, timeout).await,
        },
    }
}

/// Resolved settings shared by the book commands.
struct Context {
    settings: FeedSettings,
    links: Links,
}

impl Context {
    fn load(url: Option<&str>, timeout: Option<u64>) -> Result<Self> {
        let config = load_config()?;
        Ok(Self {
            settings: FeedSettings::resolve(&config, url, timeout)?,
            links: Links::new(&config.links),
        })
    }

    /// Fetch the feed behind a spinner and build the book.
    async fn fetch_book(&self) -> (Book, LoadSummary) {
        info!(url = %self.settings.url, "loading feed");

        let reporter = CliProgress::new();
        let (book, summary) = load_book(
            &self.settings.url,
            &FetchOptions::from(&self.settings),
            &ParseOptions::default(),
            &reporter,
        )
        .await;

        if !summary.fetched {
            warn!("feed unavailable, the book is empty");
        }
        (book, summary)
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_fetch(ctx: &Context, json: bool) -> Result<()> {
    let (book, summary) = ctx.fetch_book().await;

    if json {
        println!("{}", serde_json::to_string_pretty(book.groups())?);
        return Ok(());
    }

    println!();
    println!("  Feed:     {}", ctx.settings.url);
    println!("  Authors:  {}", summary.authors);
    println!("  Articles: {}", summary.articles);
    println!("  Time:     {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_toc(ctx: &Context, query: Option<&str>) -> Result<()> {
    let (book, _) = ctx.fetch_book().await;
    let groups = book.filter_toc(query.unwrap_or_default());

    if groups.is_empty() {
        println!("No articles found.");
        return Ok(());
    }

    for group in &groups {
        println!("{} ({})", group.author, group.articles.len());
        for article in &group.articles {
            println!(
                "  {:<8} {:<10}  {}",
                article.id, article.published_date, article.title
            );
        }
    }

    Ok(())
}

async fn cmd_authors(ctx: &Context, query: Option<&str>) -> Result<()> {
    let (book, _) = ctx.fetch_book().await;
    let groups = book.filter_authors(query.unwrap_or_default());

    if groups.is_empty() {
        println!("No authors found.");
        return Ok(());
    }

    for group in groups {
        let profile = Book::profile(group);
        match &profile.title {
            Some(title) => println!("{} ({title})", profile.author),
            None => println!("{}", profile.author),
        }
        println!(
            "  {} articles · {} views · {} comments · {}",
            profile.stats.articles,
            format_count(profile.stats.views),
            format_count(profile.stats.comments),
            to_query(&ViewState::AuthorProfile {
                author: profile.author.clone()
            }),
        );
    }

    Ok(())
}

async fn cmd_show(ctx: &Context, id: &str) -> Result<()> {
    let links = &ctx.links;
    let (book, _) = ctx.fetch_book().await;
    let (article, page) = article_page(&book, id)?;

    println!("{}", article.title);
    let mut byline = format!(
        "{} {} · {}",
        reader::salutation(&article.author_gen),
        article.author,
        article.published_date
    );
    if let Some(genre) = &article.genre {
        byline.push_str(&format!(" · {genre}"));
    }
    println!("{byline}");
    println!(
        "{} views · {} comments · page {}",
        format_count(article.views),
        format_count(article.comments),
        page.position()
    );
    println!();

    if reader::has_html(&article.content) {
        println!("{}", article.content);
    } else {
        for paragraph in reader::paragraphs(&article.content) {
            println!("{paragraph}");
            println!();
        }
    }

    if let Some(url) = links.discussion(article) {
        println!("Discussion: {url}");
    }
    let state = ViewState::Article {
        id: article.id.clone(),
    };
    if let Some(permalink) = links.permalink(&state) {
        let title = Links::article_share_title(article);
        println!("Link:       {permalink}");
        println!("Facebook:   {}", Links::facebook_share(&permalink));
        println!("X:          {}", Links::x_share(&title, &permalink));
    }

    let neighbours = [("Previous", page.previous), ("Next", page.next)];
    for (label, neighbour) in neighbours {
        if let Some(other) = neighbour {
            println!("{label}: {} ({})", other.title, other.id);
        }
    }

    Ok(())
}

/// Article and its place in the book, or a validation error for an unknown id.
fn article_page<'a>(
    book: &'a Book,
    id: &str,
) -> folio_shared::Result<(&'a Article, reader::Page<'a>)> {
    match (book.article(id), reader::page(book, id)) {
        (Some(article), Some(page)) => Ok((article, page)),
        _ => Err(FolioError::validation(format!("unknown article id '{id}'"))),
    }
}

async fn cmd_resolve(ctx: &Context, query: &str) -> Result<()> {
    let (book, _) = ctx.fetch_book().await;
    let state = resolve(&NavParams::from_link(query)?, &book);

    let description = match &state {
        ViewState::Cover => "cover".to_string(),
        ViewState::AuthorList => format!("author list ({} authors)", book.groups().len()),
        ViewState::AuthorProfile { author } => {
            let profile = book.group(author).map(Book::profile);
            match profile {
                Some(p) => format!(
                    "{} ({} articles): {}",
                    p.author,
                    p.stats.articles,
                    ctx.links.author_share_title(&p.author)
                ),
                None => author.clone(),
            }
        }
        ViewState::Article { id } => match book.article(id) {
            Some(article) => Links::article_share_title(article),
            None => id.clone(),
        },
    };

    println!("View:  {description}");
    println!("Query: {}", to_query(&state));
    println!("{}", serde_json::to_string(&state)?);

    Ok(())
}

async fn cmd_config_init(force: bool) -> Result<()> {
    let path = init_config(force)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(url: Option<&str>, timeout: Option<u64>) -> Result<()> {
    let mut config: AppConfig = load_config()?;
    let settings = FeedSettings::resolve(&config, url, timeout)?;
    config.feed.url = settings.url.to_string();
    config.feed.timeout_secs = settings.timeout_secs;

    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

/// Group digits in threes with `.`, as Vietnamese readers write counts.
fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _summary: &LoadSummary) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_use_dot_grouping() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1200), "1.200");
        assert_eq!(format_count(1_234_567), "1.234.567");
    }

    #[test]
    fn unknown_article_id_is_a_validation_error() {
        let book = folio_core::book_from_text(
            "Tác giả\tTên bài\nA\tMột\nB\tHai\n",
            &ParseOptions::with_today("1/1/2025"),
        );

        let (article, page) = article_page(&book, "row-2").expect("known id");
        assert_eq!(article.title, "Hai");
        assert_eq!(page.position(), "2 / 2");

        let err = article_page(&book, "row-9").unwrap_err();
        assert!(matches!(err, FolioError::Validation { .. }));
        assert!(err.to_string().contains("row-9"));
    }

    #[test]
    fn cli_parses_global_overrides() {
        let cli = Cli::try_parse_from([
            "folio",
            "toc",
            "--query",
            "mùa",
            "--url",
            "http://localhost:9000/feed.tsv",
            "--timeout",
            "5",
            "-vv",
        ])
        .expect("valid arguments");
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.timeout, Some(5));
        assert_eq!(cli.url.as_deref(), Some("http://localhost:9000/feed.tsv"));
        assert!(matches!(cli.command, Command::Toc { query: Some(ref q) } if q == "mùa"));
    }

    #[test]
    fn config_init_takes_force() {
        let cli = Cli::try_parse_from(["folio", "config", "init", "--force"]).expect("valid");
        assert!(matches!(
            cli.command,
            Command::Config {
                action: ConfigAction::Init { force: true }
            }
        ));
    }
}
