//! Retry & rate-limit controller driving the full URL sequence.
//!
//! URLs are processed strictly one at a time against the shared browser
//! session: a randomized pacing delay before each navigation, up to
//! three attempts with exponential backoff, a manual-intervention pause
//! when a challenge page is detected in headful mode, and a cooldown
//! after every burst. A URL whose retries exhaust is skipped, not
//! fatal; the run keeps whatever it managed to capture.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::capture;
use crate::config::CaptureConfig;
use crate::error::CaptureError;
use crate::merge;
use crate::session::BrowserSession;
use crate::urls::{self, UrlSource};
use crate::utils::artifact_file_name;

/// Poll interval while waiting for a human to clear a challenge page.
const CHALLENGE_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Challenge markers: the classic scholar captcha container, a
/// reCAPTCHA mount point, or a block-page form.
const CHALLENGE_MARKER_SCRIPT: &str = "(() => {\
     const blocked = document.getElementById('gs_captcha_ccl')\
         || document.getElementById('recaptcha')\
         || document.querySelector(\"form[action*='sorry']\");\
     return Boolean(blocked);\
 })()";

/// One successfully captured page: its 1-based position in the URL
/// sequence, its derived file name, and where the PDF bytes live.
#[derive(Debug, Clone)]
pub struct PageArtifact {
    pub index: usize,
    pub file_name: String,
    pub path: PathBuf,
}

/// Seam between the retry loop and the browser, so the retry and
/// pacing semantics are testable without Chrome.
#[async_trait]
pub trait CaptureBackend {
    async fn navigate(&self, url: &str) -> Result<(), CaptureError>;

    /// Whether known challenge markers are present on the current page.
    async fn challenge_present(&self) -> Result<bool, CaptureError>;

    /// Print the current page (already navigated and settled) to `dest`.
    async fn print_page(&self, url: &str, dest: &Path) -> Result<(), CaptureError>;
}

/// The real backend: capture engine operations on the shared session.
pub struct SessionBackend<'a> {
    session: &'a BrowserSession,
    config: &'a CaptureConfig,
}

impl<'a> SessionBackend<'a> {
    pub fn new(session: &'a BrowserSession, config: &'a CaptureConfig) -> Self {
        Self { session, config }
    }
}

#[async_trait]
impl CaptureBackend for SessionBackend<'_> {
    async fn navigate(&self, url: &str) -> Result<(), CaptureError> {
        self.session
            .page()
            .goto(url)
            .await
            .map_err(|e| CaptureError::UrlLoadFailed(e.to_string()))?;
        Ok(())
    }

    async fn challenge_present(&self) -> Result<bool, CaptureError> {
        let result = self
            .session
            .page()
            .evaluate(CHALLENGE_MARKER_SCRIPT)
            .await
            .map_err(|e| CaptureError::ScriptFailed(e.to_string()))?;
        result
            .into_value::<bool>()
            .map_err(|e| CaptureError::ScriptFailed(e.to_string()))
    }

    async fn print_page(&self, url: &str, dest: &Path) -> Result<(), CaptureError> {
        // The run loop navigated and settled already; capture with zero
        // additional settle.
        capture::capture(self.session.page(), url, dest, self.config, Duration::ZERO).await
    }
}

/// Backoff before retry `attempt` (1-based): `base`, doubling each time.
pub fn backoff_delay(base: Duration, attempt: usize) -> Duration {
    base * 2u32.saturating_pow(attempt.saturating_sub(1) as u32)
}

fn pacing_delay(config: &CaptureConfig) -> Duration {
    let min = config.min_pacing.as_secs_f64();
    let max = config.max_pacing.as_secs_f64();
    if max <= min {
        return config.min_pacing;
    }
    let secs = rand::rng().random_range(min..=max);
    Duration::from_secs_f64(secs)
}

enum ChallengeOutcome {
    NotPresent,
    Cleared,
    TimedOut,
}

/// Wait for a human to clear a detected challenge page.
///
/// Polls until the markers disappear or the timeout elapses. Detection
/// errors count as "no challenge": this is a best-effort aid, never a
/// reason to fail the attempt.
async fn wait_for_challenge<B: CaptureBackend + Sync>(
    backend: &B,
    timeout: Duration,
) -> ChallengeOutcome {
    if !backend.challenge_present().await.unwrap_or(false) {
        return ChallengeOutcome::NotPresent;
    }

    warn!("Challenge page detected; solve it in the browser window to continue");
    println!("CAPTCHA detected. Please solve it in the visible browser window.");

    let mut waited = Duration::ZERO;
    while waited < timeout {
        sleep(CHALLENGE_POLL_INTERVAL).await;
        waited += CHALLENGE_POLL_INTERVAL;
        if !backend.challenge_present().await.unwrap_or(false) {
            info!("Challenge cleared; resuming");
            return ChallengeOutcome::Cleared;
        }
    }

    warn!("Challenge not cleared within {timeout:?}; continuing anyway");
    ChallengeOutcome::TimedOut
}

/// Drive capture of the whole URL sequence against one backend.
///
/// Returns the artifacts in sequence order. Per-URL failures are
/// contained here: after the retry ceiling the URL is dropped and the
/// loop moves on.
///
/// The challenge check only runs in headful mode, where a human can
/// actually solve it. A headless run captures a challenge page like any
/// other page; that is a known limitation of unattended operation.
pub async fn drive<B: CaptureBackend + Sync>(
    backend: &B,
    urls: &[String],
    out_dir: &Path,
    config: &CaptureConfig,
) -> Vec<PageArtifact> {
    let total = urls.len();
    let mut artifacts = Vec::new();

    for (position, url) in urls.iter().enumerate() {
        let index = position + 1;
        let file_name = artifact_file_name(index, url);
        let dest = out_dir.join(&file_name);
        info!("[{index}/{total}] Printing -> {file_name}");

        // Random human-ish delay before each navigation.
        sleep(pacing_delay(config)).await;

        for attempt in 1..=config.retry_attempts {
            let result = attempt_capture(backend, url, &dest, config).await;
            match result {
                Ok(()) => {
                    artifacts.push(PageArtifact {
                        index,
                        file_name: file_name.clone(),
                        path: dest.clone(),
                    });
                    break;
                }
                Err(e) => {
                    let backoff = backoff_delay(config.backoff_base, attempt);
                    warn!(
                        "Attempt {attempt}/{} failed for {url}: {e}. Backing off {backoff:?}",
                        config.retry_attempts
                    );
                    sleep(backoff).await;
                    if attempt == config.retry_attempts {
                        warn!("Giving up on {url} after {attempt} attempts");
                    }
                }
            }
        }

        // Cooldown after bursts, but never after the final URL.
        if index % config.burst_size == 0 && index < total {
            info!("Cooling down for {:?} after {index} pages", config.cooldown);
            sleep(config.cooldown).await;
        }
    }

    artifacts
}

async fn attempt_capture<B: CaptureBackend + Sync>(
    backend: &B,
    url: &str,
    dest: &Path,
    config: &CaptureConfig,
) -> Result<(), CaptureError> {
    backend.navigate(url).await?;

    if !config.headless {
        if let ChallengeOutcome::Cleared =
            wait_for_challenge(backend, config.captcha_timeout).await
        {
            // Reload so the real content replaces the challenge page.
            backend.navigate(url).await?;
        }
    }

    // Let things settle (network idle + lazy images).
    sleep(config.settle_delay).await;

    backend.print_page(url, dest).await
}

/// Run the whole pipeline: resolve URLs, capture each against one
/// shared session, then merge the artifacts.
///
/// The session is closed exactly once, before the merge and regardless
/// of how many URLs failed. Zero artifacts is a run-level error and no
/// merged file is written.
pub async fn run_pipeline(
    source: &UrlSource,
    out_dir: &Path,
    merged_path: &Path,
    config: &CaptureConfig,
) -> Result<Vec<PageArtifact>, CaptureError> {
    config.validate()?;
    let urls = urls::resolve(source)?;
    info!("Resolved {} URLs", urls.len());

    tokio::fs::create_dir_all(out_dir).await?;

    let session = BrowserSession::launch(config).await?;
    let backend = SessionBackend::new(&session, config);
    let artifacts = drive(&backend, &urls, out_dir, config).await;
    session.close().await;

    if artifacts.is_empty() {
        return Err(CaptureError::NothingToMerge);
    }

    let pages = merge::merge_artifacts(&artifacts, merged_path)?;
    info!(
        "Merged {} artifacts ({pages} pages) into {}",
        artifacts.len(),
        merged_path.display()
    );

    Ok(artifacts)
}
