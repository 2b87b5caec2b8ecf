use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::urls::UrlSource;

#[derive(Parser)]
#[command(name = "tallpdf")]
#[command(about = "Print webpages to single-page PDFs and merge them")]
#[command(version = "0.1.0")]
#[command(group(ArgGroup::new("source").required(true).args(["urls_file", "base_url"])))]
pub struct Cli {
    #[arg(long, help = "Text file with one URL per line")]
    pub urls_file: Option<PathBuf>,

    #[arg(long, help = "Base URL containing a 'start=' param or accepting one")]
    pub base_url: Option<String>,

    #[arg(long, default_value = "0", help = "Start value for 'start=' when using --base-url")]
    pub start_from: i64,

    #[arg(long, default_value = "0", help = "End value for 'start=' (inclusive) when using --base-url")]
    pub start_to: i64,

    #[arg(long, default_value = "10", help = "Step for 'start=' when using --base-url")]
    pub step: i64,

    #[arg(long, default_value = "pdf_pages", help = "Directory for individual PDFs")]
    pub out_dir: PathBuf,

    #[arg(long, default_value = "merged.pdf", help = "Output merged PDF path")]
    pub merged: PathBuf,

    #[arg(long, help = "Use Letter width (8.5in) instead of A4 (8.27in)")]
    pub letter: bool,

    #[arg(long, help = "Margins in inches on all sides")]
    pub margin: Option<f64>,

    #[arg(long, help = "Extra wait after load before printing, in milliseconds")]
    pub wait_ms: Option<u64>,

    #[arg(long, help = "Minimum random wait between pages, in seconds")]
    pub min_wait: Option<f64>,

    #[arg(long, help = "Maximum random wait between pages, in seconds")]
    pub max_wait: Option<f64>,

    #[arg(long, help = "Rest for a cooldown after this many pages")]
    pub rest_every: Option<usize>,

    #[arg(long, help = "Cooldown seconds after each burst")]
    pub cooldown_sec: Option<u64>,

    #[arg(long, help = "Max seconds to wait for a manually solved CAPTCHA in headful mode")]
    pub captcha_timeout: Option<u64>,

    #[arg(long, help = "Run Chrome with a visible window (enables the CAPTCHA pause)")]
    pub headful: bool,

    #[arg(long, help = "Chrome user data dir to reuse (keeps cookies, login, etc.)")]
    pub user_data_dir: Option<PathBuf>,

    #[arg(long, help = "Chrome executable path")]
    pub chrome_path: Option<String>,

    #[arg(long, help = "Configuration file path (JSON)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose logging")]
    pub verbose: bool,
}

impl Cli {
    /// The URL source selected on the command line. The clap group
    /// guarantees exactly one mode was supplied.
    pub fn url_source(&self) -> UrlSource {
        if let Some(path) = &self.urls_file {
            UrlSource::File(path.clone())
        } else {
            UrlSource::Range {
                base_url: self.base_url.clone().unwrap_or_default(),
                from: self.start_from,
                to: self.start_to,
                step: self.step,
            }
        }
    }
}

pub fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}
