//! Application configuration for Folio.
//!
//! User config lives at `~/.folio/folio.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{FolioError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "folio.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".folio";

/// Published spreadsheet the book is built from (TSV export).
pub const DEFAULT_FEED_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSy_E1FyKUWbt5gAwM3Qq7E49Jzfv5783n_Of_IJaBUieRpr-aaix4EYHFN05_9FncgSWpumFywo_PC/pub?gid=2017997582&single=true&output=tsv";

// ---------------------------------------------------------------------------
// Config structs (matching folio.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Feed source settings.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Outbound link settings.
    #[serde(default)]
    pub links: LinksConfig,
}

/// `[feed]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// TSV endpoint of the published spreadsheet.
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            timeout_secs: None,
        }
    }
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.into()
}

/// `[links]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Site hosting the discussion threads for `article_id`s.
    #[serde(default = "default_discussion_base")]
    pub discussion_base: String,

    /// Site name used in share titles.
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Public page hosting the book; share links are built from it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_url: Option<String>,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            discussion_base: default_discussion_base(),
            site_name: default_site_name(),
            book_url: None,
        }
    }
}

fn default_discussion_base() -> String {
    "https://vnexpress.net".into()
}
fn default_site_name() -> String {
    "VnExpress Góc nhìn".into()
}

// ---------------------------------------------------------------------------
// Feed settings (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime feed settings, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// Validated feed URL.
    pub url: Url,
    /// Request timeout in seconds, if any.
    pub timeout_secs: Option<u64>,
}

impl FeedSettings {
    /// Build settings from config, letting explicit overrides win.
    pub fn resolve(
        config: &AppConfig,
        url_override: Option<&str>,
        timeout_override: Option<u64>,
    ) -> Result<Self> {
        let raw = url_override.unwrap_or(&config.feed.url);
        Ok(Self {
            url: parse_feed_url(raw)?,
            timeout_secs: timeout_override.or(config.feed.timeout_secs),
        })
    }
}

impl TryFrom<&AppConfig> for FeedSettings {
    type Error = FolioError;

    fn try_from(config: &AppConfig) -> Result<Self> {
        Self::resolve(config, None, None)
    }
}

/// Parse and check a feed URL (http or https only).
pub fn parse_feed_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FolioError::config("feed url is empty"));
    }
    let url = Url::parse(trimmed)
        .map_err(|e| FolioError::config(format!("invalid feed url '{trimmed}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FolioError::config(format!(
            "unsupported feed url scheme '{other}': expected http or https"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.folio/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| FolioError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.folio/folio.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| FolioError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| FolioError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
///
/// An existing file is left alone unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    init_config_in(&config_dir()?, force)
}

/// [`init_config`] against an explicit directory.
pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        return Err(FolioError::config(format!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        )));
    }

    std::fs::create_dir_all(dir).map_err(|e| FolioError::io(dir, e))?;

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| FolioError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| FolioError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[feed]"));
        assert!(toml_str.contains("output=tsv"));
        assert!(toml_str.contains("discussion_base"));
        assert!(!toml_str.contains("timeout_secs"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[feed]
timeout_secs = 15

[links]
site_name = "Example"
book_url = "https://example.com/book/"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert_eq!(config.feed.timeout_secs, Some(15));
        assert_eq!(config.links.site_name, "Example");
        assert_eq!(config.links.discussion_base, "https://vnexpress.net");
        assert_eq!(config.links.book_url.as_deref(), Some("https://example.com/book/"));
    }

    #[test]
    fn feed_settings_from_app_config() {
        let app = AppConfig::default();
        let settings = FeedSettings::try_from(&app).expect("default url is valid");
        assert_eq!(settings.url.host_str(), Some("docs.google.com"));
        assert!(settings.timeout_secs.is_none());
    }

    #[test]
    fn feed_settings_overrides_win() {
        let mut app = AppConfig::default();
        app.feed.timeout_secs = Some(30);
        let settings =
            FeedSettings::resolve(&app, Some("http://localhost:8080/feed.tsv"), Some(5))
                .expect("override url is valid");
        assert_eq!(settings.url.as_str(), "http://localhost:8080/feed.tsv");
        assert_eq!(settings.timeout_secs, Some(5));
    }

    #[test]
    fn init_keeps_an_existing_file() {
        let dir = std::env::temp_dir().join(format!("folio-init-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let path = init_config_in(&dir, false).expect("first init");
        std::fs::write(&path, "[links]\nsite_name = \"Mine\"\n").expect("edit config");

        let err = init_config_in(&dir, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        let kept = load_config_from(&path).expect("load kept config");
        assert_eq!(kept.links.site_name, "Mine");

        init_config_in(&dir, true).expect("forced init");
        let reset = load_config_from(&path).expect("load reset config");
        assert_eq!(reset.links.site_name, "VnExpress Góc nhìn");

        std::fs::remove_dir_all(&dir).expect("clean up");
    }

    #[test]
    fn feed_url_validation() {
        assert!(parse_feed_url("").is_err());
        assert!(parse_feed_url("not a url").is_err());
        let err = parse_feed_url("ftp://example.com/feed.tsv").unwrap_err();
        assert!(err.to_string().contains("unsupported feed url scheme"));
    }
}
