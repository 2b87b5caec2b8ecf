//! Page capture engine: render one URL into a single tall-page PDF.
//!
//! The printed page is exactly as tall as the rendered document, so the
//! browser never paginates. Chrome's print facility assumes 96 CSS
//! pixels per inch; the measured scroll height converts at that ratio,
//! plus margins, clamped to the configured bounds.

use std::path::Path;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::emulation::SetEmulatedMediaParams;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::page::Page;
use tokio::time::sleep;
use tracing::debug;

use crate::config::CaptureConfig;
use crate::error::CaptureError;

/// CSS reference pixel density assumed by Chrome's print-to-PDF.
pub const PX_PER_INCH: f64 = 96.0;

/// Layout metrics differ across engines; taking the max over both the
/// root and body elements gives the real document height everywhere.
const CONTENT_HEIGHT_SCRIPT: &str = "Math.max(\
     document.body.scrollHeight, document.documentElement.scrollHeight,\
     document.body.offsetHeight, document.documentElement.offsetHeight,\
     document.body.clientHeight, document.documentElement.clientHeight)";

/// Convert a measured content height in CSS pixels to a physical paper
/// height in inches.
///
/// Adds the margin on both top and bottom, then clamps to
/// `[min_height_in, max_height_in]`. Monotonic in the pixel height.
pub fn page_height_inches(scroll_height_px: f64, config: &CaptureConfig) -> f64 {
    let height_in = scroll_height_px / PX_PER_INCH + config.margin_in * 2.0;
    height_in.clamp(config.min_height_in, config.max_height_in)
}

/// Render `url` in the shared page and write a single-page PDF to `dest`.
///
/// `settle` is the post-navigation wait; the run loop passes zero when
/// it has already waited on the current page. Any browser-control error
/// propagates to the caller, which owns the retry policy.
pub async fn capture(
    page: &Page,
    url: &str,
    dest: &Path,
    config: &CaptureConfig,
    settle: Duration,
) -> Result<(), CaptureError> {
    page.goto(url)
        .await
        .map_err(|e| CaptureError::UrlLoadFailed(e.to_string()))?;

    // Let network & lazy content settle a bit.
    if !settle.is_zero() {
        sleep(settle).await;
    }

    force_screen_media(page).await?;

    let scroll_height = measure_content_height(page).await?;
    let paper_height = page_height_inches(scroll_height, config);
    debug!(url, scroll_height, paper_height, "Measured page");

    let params = PrintToPdfParams::builder()
        .print_background(true)
        .prefer_css_page_size(false)
        .paper_width(config.paper_width.inches())
        .paper_height(paper_height)
        .margin_top(config.margin_in)
        .margin_bottom(config.margin_in)
        .margin_left(config.margin_in)
        .margin_right(config.margin_in)
        .display_header_footer(false)
        .build();

    let pdf = page
        .pdf(params)
        .await
        .map_err(|e| CaptureError::PrintFailed(e.to_string()))?;

    tokio::fs::write(dest, &pdf).await?;
    debug!(url, dest = %dest.display(), bytes = pdf.len(), "Wrote page PDF");

    Ok(())
}

/// Keep the renderer on screen-media CSS so content hidden by print
/// stylesheets still makes it into the PDF.
async fn force_screen_media(page: &Page) -> Result<(), CaptureError> {
    let params = SetEmulatedMediaParams::builder().media("screen").build();
    page.execute(params)
        .await
        .map_err(|e| CaptureError::ScriptFailed(e.to_string()))?;
    Ok(())
}

/// Full rendered document height in CSS pixels.
async fn measure_content_height(page: &Page) -> Result<f64, CaptureError> {
    let result = page
        .evaluate(CONTENT_HEIGHT_SCRIPT)
        .await
        .map_err(|e| CaptureError::ScriptFailed(e.to_string()))?;

    result
        .into_value::<f64>()
        .map_err(|e| CaptureError::ScriptFailed(format!("height was not a number: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_within_bounds() {
        let config = CaptureConfig::default();
        // 960 px at 96 dpi is 10 in, plus 0.4 in margin on both sides.
        let height = page_height_inches(960.0, &config);
        assert!((height - 10.8).abs() < 1e-9);
    }

    #[test]
    fn test_height_clamps_to_min() {
        let config = CaptureConfig::default();
        assert_eq!(page_height_inches(0.0, &config), config.min_height_in);
    }

    #[test]
    fn test_height_clamps_to_max() {
        let config = CaptureConfig::default();
        assert_eq!(page_height_inches(50_000.0, &config), config.max_height_in);
    }

    #[test]
    fn test_height_monotonic() {
        let config = CaptureConfig::default();
        let mut last = 0.0;
        for px in (0..60_000).step_by(500) {
            let height = page_height_inches(px as f64, &config);
            assert!(height >= last, "height decreased at {px} px");
            assert!(height >= config.min_height_in && height <= config.max_height_in);
            last = height;
        }
    }
}
