use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use indicatif::ProgressBar;
use tracing::{info, warn};
use url::Url;

use crate::fetch::PageSource;
use crate::model::PostRecord;
use crate::parser::{self, CompiledLayout};
use crate::sentiment::SentimentScorer;
use crate::settings::{PipelineConfig, Variant};

/// Waits out the fixed delay between page fetches.
#[async_trait]
pub trait Pacer {
    async fn pause(&self, delay: Duration);
}

pub struct TokioPacer;

#[async_trait]
impl<T: Pacer + Sync + ?Sized> Pacer for &T {
    async fn pause(&self, delay: Duration) {
        (**self).pause(delay).await
    }
}

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// What a single page fetch amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Entries {
        records: Vec<PostRecord>,
        next: Option<String>,
    },
    /// The page parsed but no post survived extraction (or filtering).
    EmptyNoMatches { next: Option<String> },
    /// The fetch itself failed; there is no next link to follow.
    EmptyDueToFailure { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Unfiltered run hit a page with no posts.
    NoPosts,
    FetchFailed,
    /// The page had no next link.
    LastPage,
    PageLimit,
}

#[derive(Debug)]
pub struct RunReport {
    pub records: Vec<PostRecord>,
    pub pages_fetched: usize,
    pub stop: StopReason,
}

pub struct Driver<'a, S, P> {
    config: &'a PipelineConfig,
    source: S,
    pacer: P,
    scorer: &'a dyn SentimentScorer,
    layout: CompiledLayout,
    progress: ProgressBar,
}

impl<'a, S: PageSource, P: Pacer> Driver<'a, S, P> {
    pub fn new(
        config: &'a PipelineConfig,
        source: S,
        pacer: P,
        scorer: &'a dyn SentimentScorer,
    ) -> Result<Self> {
        Ok(Driver {
            config,
            source,
            pacer,
            scorer,
            layout: config.layout.compile()?,
            progress: ProgressBar::hidden(),
        })
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Follow next-page links from the start URL until a stop condition hits.
    pub async fn run(&self) -> RunReport {
        let mut records = Vec::new();
        let mut current = self.config.start_url.clone();
        let mut pages_fetched = 0;
        let mut stop = StopReason::PageLimit;

        for page_number in 1..=self.config.max_pages {
            info!(page = page_number, url = %current, "Scraping page");
            let outcome = self.fetch_page(&current).await;
            pages_fetched += 1;
            self.progress.inc(1);

            let next = match outcome {
                PageOutcome::EmptyDueToFailure { reason } => {
                    warn!(url = %current, %reason, "Fetch failed, stopping");
                    stop = StopReason::FetchFailed;
                    break;
                }
                PageOutcome::EmptyNoMatches { next } => match self.config.variant {
                    Variant::Unfiltered => {
                        warn!(url = %current, "No posts found, stopping");
                        stop = StopReason::NoPosts;
                        break;
                    }
                    Variant::Filtered(_) => {
                        info!(url = %current, "No matching posts on this page");
                        next
                    }
                },
                PageOutcome::Entries {
                    records: page,
                    next,
                } => {
                    info!(page = page_number, posts = page.len(), "Extracted posts");
                    records.extend(page);
                    next
                }
            };

            let Some(next) = next else {
                info!("No further pages found");
                stop = StopReason::LastPage;
                break;
            };
            if page_number == self.config.max_pages {
                break;
            }

            current = resolve_link(&current, &next);
            self.pacer.pause(self.config.delay).await;
        }

        self.progress.finish_and_clear();
        info!(
            posts = records.len(),
            pages = pages_fetched,
            ?stop,
            "Pipeline finished"
        );
        RunReport {
            records,
            pages_fetched,
            stop,
        }
    }

    async fn fetch_page(&self, url: &str) -> PageOutcome {
        let markup = match self.source.fetch(url).await {
            Ok(markup) => markup,
            Err(e) => {
                return PageOutcome::EmptyDueToFailure {
                    reason: e.to_string(),
                }
            }
        };

        let page = parser::extract_page(
            &markup,
            &self.layout,
            self.config.variant.keywords(),
            self.scorer,
        );
        if page.records.is_empty() {
            PageOutcome::EmptyNoMatches {
                next: page.next_page_url,
            }
        } else {
            PageOutcome::Entries {
                records: page.records,
                next: page.next_page_url,
            }
        }
    }
}

/// Resolve `href` against the page it came from; absolute links pass through.
fn resolve_link(base: &str, href: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}
