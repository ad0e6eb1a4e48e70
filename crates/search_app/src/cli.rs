use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use search_engine::SearchSettings;
use search_logging::LogDestination;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "search_app", about = "Terminal front end for the search API")]
pub(crate) struct Cli {
    /// Search API base URL; requests go to `{endpoint}/search?q=...`
    #[arg(long, env = "SEARCH_API_URL", default_value = "http://localhost:3001")]
    pub(crate) endpoint: String,

    /// Page URL the front end starts on; its `q` parameter seeds the first search
    #[arg(long, env = "SEARCH_PAGE_URL", default_value = "http://localhost:4321/swap/")]
    pub(crate) page_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "SEARCH_TIMEOUT_SECS", default_value_t = 30)]
    pub(crate) timeout_secs: u64,

    /// Connect timeout in seconds
    #[arg(long, env = "SEARCH_CONNECT_TIMEOUT_SECS", default_value_t = 10)]
    pub(crate) connect_timeout_secs: u64,

    /// Where log output goes
    #[arg(long, env = "SEARCH_LOG", value_enum, default_value_t = LogTarget::File)]
    pub(crate) log: LogTarget,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, env = "SEARCH_LOG_LEVEL", default_value = "info")]
    pub(crate) log_level: LevelFilter,

    /// Print settled searches as JSON lines instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub(crate) fn search_settings(&self) -> anyhow::Result<SearchSettings> {
        let base_url = Url::parse(&self.endpoint)
            .with_context(|| format!("invalid search endpoint {:?}", self.endpoint))?;
        let settings = SearchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.timeout_secs),
            ..SearchSettings::new(base_url)
        };
        // Reject endpoints that cannot take a path, such as `data:` URLs.
        settings
            .search_url("")
            .with_context(|| format!("unusable search endpoint {:?}", self.endpoint))?;
        Ok(settings)
    }
}
