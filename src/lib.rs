//! # tallpdf
//!
//! Print a sequence of web pages to single tall-page PDFs and merge
//! them into one document. Each page is printed through Chrome's native
//! print-to-PDF facility onto a sheet exactly as tall as its rendered
//! content, so nothing is ever paginated. The run loop tolerates flaky
//! networks and rate-limiting: randomized pacing between navigations,
//! bounded retries with exponential backoff, cooldowns after bursts,
//! and a manual-intervention pause when a CAPTCHA shows up in headful
//! mode.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tallpdf::{run_pipeline, CaptureConfig, UrlSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = UrlSource::Range {
//!         base_url: "https://scholar.example.com/scholar?q=rust".to_string(),
//!         from: 0,
//!         to: 40,
//!         step: 10,
//!     };
//!     let config = CaptureConfig::default();
//!
//!     let artifacts = run_pipeline(
//!         &source,
//!         Path::new("pdf_pages"),
//!         Path::new("merged.pdf"),
//!         &config,
//!     )
//!     .await?;
//!     println!("Captured {} pages", artifacts.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # From an explicit URL list
//! tallpdf --urls-file urls.txt --out-dir pdf_pages --merged merged.pdf
//!
//! # Sweeping a result-page range, visible browser for CAPTCHA solving
//! tallpdf --base-url 'https://scholar.example.com/scholar?q=rust' \
//!     --start-from 0 --start-to 90 --step 10 --headful
//! ```

/// Page capture engine: render one URL into a single tall-page PDF
pub mod capture;

/// Command-line interface implementation
pub mod cli;

/// Configuration and settings for the capture pipeline
pub mod config;

/// Error types and error handling utilities
pub mod error;

/// PDF merge assembler combining captured pages into one document
pub mod merge;

/// Retry & rate-limit controller driving the URL sequence
pub mod runner;

/// Shared browser session lifecycle management
pub mod session;

/// URL source resolution from list files and pagination ranges
pub mod urls;

/// Utility functions and helpers
pub mod utils;

#[cfg(test)]
mod tests;

pub use capture::*;
pub use cli::*;
pub use config::*;
pub use error::*;
pub use merge::*;
pub use runner::*;
pub use session::*;
pub use urls::*;
pub use utils::*;
