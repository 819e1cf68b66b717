mod analysis;
mod fetch;
mod model;
mod parser;
mod pipeline;
mod sentiment;
mod settings;
mod sink;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use fetch::HttpFetcher;
use pipeline::{Driver, StopReason, TokioPacer};
use sentiment::lexicon::Lexicon;
use sentiment::LexiconScorer;
use settings::{Overrides, PipelineConfig, Settings, Variant};

#[derive(Parser)]
#[command(name = "forum_scraper", about = "Forum listing scraper with title sentiment")]
struct Cli {
    /// Config file (TOML/YAML/JSON); ./forum_scraper.toml is used when present
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every post, stopping at the first page without any
    Scrape {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Scrape only posts whose title contains one of the keywords
    Filter {
        #[command(flatten)]
        run: RunArgs,
        /// Comma-separated keywords (default: housing terms)
        #[arg(short, long, value_delimiter = ',')]
        keywords: Option<Vec<String>>,
    },
    /// Describe a scraped CSV
    Summary {
        /// CSV file to read
        #[arg(short, long, default_value = settings::UNFILTERED_OUTPUT)]
        input: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Listing page to start from
    #[arg(short, long)]
    url: Option<String>,
    /// Max pages to fetch
    #[arg(short = 'n', long)]
    pages: Option<usize>,
    /// Pause between pages, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,
    /// Output CSV path
    #[arg(short, long)]
    out: Option<PathBuf>,
}

impl RunArgs {
    fn into_overrides(self, keywords: Option<Vec<String>>) -> Overrides {
        Overrides {
            start_url: self.url,
            max_pages: self.pages,
            delay_ms: self.delay_ms,
            keywords,
            output: self.out,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scrape { run } => {
            let settings = Settings::load(cli.config.as_deref())?;
            let config = settings.into_pipeline(false, run.into_overrides(None));
            scrape(&config).await
        }
        Commands::Filter { run, keywords } => {
            let settings = Settings::load(cli.config.as_deref())?;
            let config = settings.into_pipeline(true, run.into_overrides(keywords));
            scrape(&config).await
        }
        Commands::Summary { input } => {
            let records = sink::read_records(&input)?;
            match analysis::Summary::from_records(&records) {
                Some(summary) => print!("{}", summary.render()),
                None => println!("No rows in {:?}.", input),
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn scrape(config: &PipelineConfig) -> Result<()> {
    let lexicon = match &config.lexicon {
        Some(path) => Lexicon::from_path(path)?,
        None => Lexicon::builtin()?,
    };
    info!(words = lexicon.len(), "Loaded sentiment lexicon");
    let scorer = LexiconScorer::new(lexicon);
    if let Some(keywords) = config.variant.keywords() {
        let list: Vec<&str> = keywords.iter().collect();
        info!(
            count = keywords.len(),
            keywords = %list.join(", "),
            "Filtering titles by keyword"
        );
    }
    let fetcher = HttpFetcher::new(&config.user_agent, &config.headers)?;

    let pb = ProgressBar::new(config.max_pages as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages")?
            .progress_chars("=> "),
    );

    let driver = Driver::new(config, fetcher, TokioPacer, &scorer)?.with_progress(pb);
    let report = driver.run().await;
    if report.stop == StopReason::FetchFailed {
        warn!("Stopped after a failed fetch; later pages were not scraped");
    }
    let written = sink::write_records(&config.output, &report.records)?;

    let matching = match config.variant {
        Variant::Unfiltered => "",
        Variant::Filtered(_) => " matching keywords",
    };
    println!(
        "Scraped {} posts{} from {} pages, saved to {:?}.",
        written, matching, report.pages_fetched, config.output
    );
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
