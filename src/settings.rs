use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::parser::text::KeywordSet;
use crate::parser::ListingLayout;

pub const DEFAULT_START_URL: &str = "https://old.reddit.com/r/college/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/70.0.3538.77 Safari/537.36";
pub const DEFAULT_DELAY_MS: u64 = 2000;
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "housing",
    "roommate",
    "dorm",
    "rent",
    "landlord",
    "lease",
    "resident",
    "property management",
    "maintenance",
    "amenities",
    "off-campus",
    "on-campus",
    "apartment",
    "utilities",
    "sublet",
];

pub const UNFILTERED_OUTPUT: &str = "reddit_college_scraped_analysis.csv";
pub const FILTERED_OUTPUT: &str = "reddit_filtered_scraped_analysis.csv";

const DEFAULT_CONFIG_FILE: &str = "forum_scraper.toml";
const ENV_PREFIX: &str = "FORUM";

/// Raw settings as layered from defaults, an optional config file and
/// `FORUM_*` environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub start_url: String,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    /// Unset means the variant's own default (3 unfiltered, 10 filtered).
    pub max_pages: Option<usize>,
    pub delay_ms: u64,
    pub keywords: Vec<String>,
    pub output: Option<PathBuf>,
    pub lexicon: Option<PathBuf>,
    pub layout: ListingLayout,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            start_url: DEFAULT_START_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            headers: HashMap::new(),
            max_pages: None,
            delay_ms: DEFAULT_DELAY_MS,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            output: None,
            lexicon: None,
            layout: ListingLayout::default(),
        }
    }
}

impl Settings {
    /// Load settings. An explicit `file` must exist; otherwise `forum_scraper.toml`
    /// in the working directory is picked up when present.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let builder = config::Config::builder();
        let builder = match file {
            Some(path) => builder.add_source(config::File::from(path)),
            None => {
                builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
            }
        };

        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("keywords"),
            )
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Apply command-line overrides and freeze into a pipeline configuration.
    pub fn into_pipeline(self, filtered: bool, overrides: Overrides) -> PipelineConfig {
        let variant = if filtered {
            let keywords = overrides.keywords.unwrap_or(self.keywords);
            Variant::Filtered(KeywordSet::new(keywords))
        } else {
            Variant::Unfiltered
        };

        let max_pages = overrides
            .max_pages
            .or(self.max_pages)
            .unwrap_or_else(|| variant.default_max_pages());
        let output = overrides
            .output
            .or(self.output)
            .unwrap_or_else(|| PathBuf::from(variant.default_output()));
        let delay_ms = overrides.delay_ms.unwrap_or(self.delay_ms);

        PipelineConfig {
            start_url: overrides.start_url.unwrap_or(self.start_url),
            user_agent: self.user_agent,
            headers: self.headers,
            max_pages,
            delay: Duration::from_millis(delay_ms),
            variant,
            output,
            lexicon: self.lexicon,
            layout: self.layout,
        }
    }
}

/// Values given on the command line; `None` defers to [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub start_url: Option<String>,
    pub max_pages: Option<usize>,
    pub delay_ms: Option<u64>,
    pub keywords: Option<Vec<String>>,
    pub output: Option<PathBuf>,
}

/// The two pipeline flavours. They differ in filtering and in whether a page
/// with no surviving posts ends the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variant {
    Unfiltered,
    Filtered(KeywordSet),
}

impl Variant {
    pub fn keywords(&self) -> Option<&KeywordSet> {
        match self {
            Variant::Unfiltered => None,
            Variant::Filtered(keywords) => Some(keywords),
        }
    }

    fn default_max_pages(&self) -> usize {
        match self {
            Variant::Unfiltered => 3,
            Variant::Filtered(_) => 10,
        }
    }

    fn default_output(&self) -> &'static str {
        match self {
            Variant::Unfiltered => UNFILTERED_OUTPUT,
            Variant::Filtered(_) => FILTERED_OUTPUT,
        }
    }
}

/// Everything one pipeline run needs. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub start_url: String,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    pub max_pages: usize,
    pub delay: Duration,
    pub variant: Variant,
    pub output: PathBuf,
    pub lexicon: Option<PathBuf>,
    pub layout: ListingLayout,
}
