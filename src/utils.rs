use std::time::Duration;

/// Longest URL-derived portion of an artifact file name.
pub const SAFE_NAME_MAX_LEN: usize = 150;

/// Derive a filesystem-safe name from a URL.
///
/// Strips the scheme, caps the length, and collapses every run of
/// characters outside `[a-zA-Z0-9._-]` into a single underscore. Falls
/// back to `"page"` when nothing survives.
pub fn safe_name(url: &str) -> String {
    let base = url.trim();
    let base = base.rsplit("://").next().unwrap_or(base);

    let mut out = String::new();
    let mut in_run = false;
    for c in base.chars().take(SAFE_NAME_MAX_LEN) {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }

    if out.is_empty() {
        "page".to_string()
    } else {
        out
    }
}

/// File name for the artifact of the `index`-th URL (1-based).
///
/// The zero-padded ordinal prefix keeps directory listings in capture
/// order, which is also merge order.
pub fn artifact_file_name(index: usize, url: &str) -> String {
    format!("{:03}_{}.pdf", index, safe_name(url))
}

pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let millis = duration.subsec_millis();

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else if seconds > 0 {
        format!("{}.{}s", seconds, millis / 100)
    } else {
        format!("{millis}ms")
    }
}
