//! Configuration management with serde serialization/deserialization
//!
//! This module provides the per-run settings for the capture pipeline,
//! including page sizing, pacing/cooldown behavior, retry policy, and
//! browser launch parameters.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CaptureError;

/// Default desktop user agent, matching a current stable Chrome release.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

/// Physical paper width presets for the printed pages
///
/// Only the width is preset; the height of every page is computed from
/// the rendered content so that each document fits on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum PaperWidth {
    /// A4 width (8.27 in)
    A4,
    /// US Letter width (8.5 in)
    Letter,
}

impl PaperWidth {
    pub fn inches(&self) -> f64 {
        match self {
            PaperWidth::A4 => 8.27,
            PaperWidth::Letter => 8.5,
        }
    }
}

impl Default for PaperWidth {
    fn default() -> Self {
        Self::A4
    }
}

/// Main configuration structure for a capture run
///
/// Immutable once the run starts. Controls page geometry, the politeness
/// behavior of the URL loop (pacing, bursts, cooldowns), the retry
/// policy, and how the shared browser session is launched.
///
/// # Examples
///
/// ```rust
/// use tallpdf::{CaptureConfig, PaperWidth};
///
/// // Use default configuration
/// let config = CaptureConfig::default();
///
/// // Create custom configuration
/// let config = CaptureConfig {
///     paper_width: PaperWidth::Letter,
///     burst_size: 5,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaptureConfig {
    /// Physical paper width preset (default: A4)
    pub paper_width: PaperWidth,

    /// Margin in inches applied on all four sides (default: 0.4)
    ///
    /// The top and bottom margins are also added to the computed paper
    /// height so they never eat into the content.
    pub margin_in: f64,

    /// Lower bound for the computed paper height in inches (default: 1.0)
    pub min_height_in: f64,

    /// Upper bound for the computed paper height in inches (default: 200.0)
    ///
    /// Extremely tall pages are clamped here; content past the limit is
    /// cut off rather than spilling onto a second page.
    pub max_height_in: f64,

    /// Wait after navigation before measuring and printing (default: 1500 ms)
    ///
    /// Gives deferred network activity and lazily-loaded content time to
    /// finish so the measured height reflects the final layout.
    pub settle_delay: Duration,

    /// Minimum randomized wait before each navigation (default: 2 s)
    pub min_pacing: Duration,

    /// Maximum randomized wait before each navigation (default: 5 s)
    ///
    /// Each per-URL delay is drawn uniformly from
    /// `[min_pacing, max_pacing]` to avoid fixed-interval request
    /// patterns.
    pub max_pacing: Duration,

    /// Number of URLs processed between cooldowns (default: 10)
    pub burst_size: usize,

    /// Pause inserted after each burst (default: 1 s)
    pub cooldown: Duration,

    /// Attempts per URL before it is skipped (default: 3)
    pub retry_attempts: usize,

    /// Base backoff after a failed attempt (default: 3 s)
    ///
    /// Doubles on every subsequent failure of the same URL.
    pub backoff_base: Duration,

    /// How long to wait for a manually solved challenge page (default: 600 s)
    ///
    /// Only applies to headful sessions; when it elapses the run
    /// proceeds anyway.
    pub captcha_timeout: Duration,

    /// Run Chrome without a visible window (default: true)
    ///
    /// Headful mode enables the interstitial-challenge check, which
    /// needs a human in front of the browser.
    pub headless: bool,

    /// Chrome user data directory to reuse (default: none)
    ///
    /// Keeps cookies and login state between runs.
    pub user_data_dir: Option<PathBuf>,

    /// Path to Chrome/Chromium executable (default: auto-detect)
    pub chrome_path: Option<String>,

    /// User-Agent string for the session (default: desktop Chrome)
    pub user_agent: Option<String>,

    /// Browser window width in pixels (default: 1280)
    pub viewport_width: u32,

    /// Browser window height in pixels (default: 2000)
    ///
    /// A tall viewport reduces reflow surprises between measuring and
    /// printing.
    pub viewport_height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            paper_width: PaperWidth::A4,
            margin_in: 0.4,
            min_height_in: 1.0,
            max_height_in: 200.0,
            settle_delay: Duration::from_millis(1500),
            min_pacing: Duration::from_secs(2),
            max_pacing: Duration::from_secs(5),
            burst_size: 10,
            cooldown: Duration::from_secs(1),
            retry_attempts: 3,
            backoff_base: Duration::from_secs(3),
            captcha_timeout: Duration::from_secs(600),
            headless: true,
            user_data_dir: None,
            chrome_path: None,
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            viewport_width: 1280,
            viewport_height: 2000,
        }
    }
}

impl CaptureConfig {
    /// Check the cross-field invariants before a run starts.
    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.min_height_in > self.max_height_in {
            return Err(CaptureError::ConfigurationError(format!(
                "min height {} exceeds max height {}",
                self.min_height_in, self.max_height_in
            )));
        }
        if self.min_pacing > self.max_pacing {
            return Err(CaptureError::ConfigurationError(format!(
                "min wait {:?} exceeds max wait {:?}",
                self.min_pacing, self.max_pacing
            )));
        }
        if !self.margin_in.is_finite() || self.margin_in < 0.0 {
            return Err(CaptureError::ConfigurationError(format!(
                "margin must be non-negative, got {}",
                self.margin_in
            )));
        }
        if self.retry_attempts == 0 {
            return Err(CaptureError::ConfigurationError(
                "retry attempts must be greater than 0".to_string(),
            ));
        }
        if self.burst_size == 0 {
            return Err(CaptureError::ConfigurationError(
                "burst size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Generate Chrome command-line arguments based on configuration
///
/// Window size, user data directory, and headless mode are handled by
/// the `BrowserConfig` builder, so only the remaining flags live here.
pub fn get_chrome_args(config: &CaptureConfig) -> Vec<String> {
    let mut args = vec![
        "--disable-gpu".to_string(),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
    ];

    if let Some(user_agent) = &config.user_agent {
        args.push(format!("--user-agent={user_agent}"));
    }

    args
}

pub fn create_browser_config(
    config: &CaptureConfig,
) -> Result<chromiumoxide::browser::BrowserConfig, CaptureError> {
    use chromiumoxide::browser::BrowserConfig;

    let mut builder = BrowserConfig::builder()
        .window_size(config.viewport_width, config.viewport_height)
        .args(get_chrome_args(config));

    if !config.headless {
        builder = builder.with_head();
    }

    if let Some(user_data_dir) = &config.user_data_dir {
        builder = builder.user_data_dir(user_data_dir);
    }

    if let Some(chrome_path) = &config.chrome_path {
        builder = builder.chrome_executable(chrome_path);
    }

    builder
        .build()
        .map_err(CaptureError::BrowserLaunchFailed)
}
