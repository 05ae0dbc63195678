//! Command-line configuration.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use pico_args::Arguments;
use reqwest::Url;

pub const DEFAULT_FEED_URL: &str = "https://feeds.bbci.co.uk/news/rss.xml";
pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_PREFETCH_DEPTH: usize = 5;

pub const HELP: &str = "\
top-headlines — a live news-headlines list for the terminal

USAGE:
    top-headlines [OPTIONS] [FEED_URL]

ARGS:
    FEED_URL                 RSS feed to load [default: https://feeds.bbci.co.uk/news/rss.xml]

OPTIONS:
    --news-api-key KEY       Load NewsAPI top headlines instead of RSS [env: NEWS_API_KEY]
    --country CODE           NewsAPI country [default: us]
    --prefetch N             Rows prefetched below the viewport [default: 5]
    --log-file PATH          Write logs here (filter with RUST_LOG)
    -h, --help               Print this help
";

/// Where headlines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedConfig {
    Rss { url: Url },
    NewsApi { api_key: String, country: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub feed: FeedConfig,
    pub prefetch_depth: usize,
    pub log_file: Option<PathBuf>,
    pub show_help: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::parse(Arguments::from_env(), std::env::var("NEWS_API_KEY").ok())
    }

    pub fn from_args<I, S>(args: I, env_api_key: Option<String>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self::parse(
            Arguments::from_vec(args.into_iter().map(Into::into).collect()),
            env_api_key,
        )
    }

    fn parse(mut args: Arguments, env_api_key: Option<String>) -> Result<Self> {
        let show_help = args.contains(["-h", "--help"]);

        let api_key: Option<String> = args
            .opt_value_from_str("--news-api-key")?
            .or(env_api_key)
            .filter(|key: &String| !key.is_empty());
        let country: String = args
            .opt_value_from_str("--country")?
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());
        let prefetch_depth: usize = args
            .opt_value_from_str("--prefetch")?
            .unwrap_or(DEFAULT_PREFETCH_DEPTH);
        let log_file: Option<PathBuf> = args.opt_value_from_str("--log-file")?;
        let feed_url: Option<String> = args.opt_free_from_str()?;

        let rest = args.finish();
        if !rest.is_empty() {
            bail!("unexpected arguments: {rest:?}");
        }

        let feed = match api_key {
            Some(api_key) => FeedConfig::NewsApi { api_key, country },
            None => {
                let raw = feed_url.as_deref().unwrap_or(DEFAULT_FEED_URL);
                let url = Url::parse(raw).with_context(|| format!("invalid feed URL {raw}"))?;
                FeedConfig::Rss { url }
            }
        };

        Ok(Self {
            feed,
            prefetch_depth,
            log_file,
            show_help,
        })
    }
}
