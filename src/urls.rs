//! URL source resolution: explicit list files and `start=` ranges.

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::CaptureError;

/// Where the ordered URL sequence comes from. Exactly one mode is used
/// per run.
#[derive(Debug, Clone)]
pub enum UrlSource {
    /// Newline-delimited list file, one URL per line.
    File(PathBuf),
    /// Base URL whose `start` query parameter is swept over
    /// `from..=to` in increments of `step`.
    Range {
        base_url: String,
        from: i64,
        to: i64,
        step: i64,
    },
}

/// Produce the ordered URL sequence for a run.
///
/// An empty sequence is an input error, reported before any browser
/// work begins.
pub fn resolve(source: &UrlSource) -> Result<Vec<String>, CaptureError> {
    let urls = match source {
        UrlSource::File(path) => read_urls_from_file(path)?,
        UrlSource::Range {
            base_url,
            from,
            to,
            step,
        } => build_urls_from_range(base_url, *from, *to, *step)?,
    };

    if urls.is_empty() {
        return Err(CaptureError::NoUrls);
    }

    Ok(urls)
}

fn read_urls_from_file(path: &Path) -> Result<Vec<String>, CaptureError> {
    let content = std::fs::read_to_string(path)?;
    let urls = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect();

    Ok(urls)
}

/// Expand `base_url` into one URL per `start` value in `[from, to]`.
///
/// The `start` parameter is replaced in place when present and appended
/// otherwise; every other query parameter, the path, and the fragment
/// pass through untouched.
fn build_urls_from_range(
    base_url: &str,
    from: i64,
    to: i64,
    step: i64,
) -> Result<Vec<String>, CaptureError> {
    if step < 1 {
        return Err(CaptureError::ConfigurationError(format!(
            "step must be at least 1, got {step}"
        )));
    }

    let base = Url::parse(base_url)
        .map_err(|e| CaptureError::InvalidUrl(format!("{base_url}: {e}")))?;
    let pairs: Vec<(String, String)> = base
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut urls = Vec::new();
    let mut start = from;
    while start <= to {
        let mut url = base.clone();
        {
            let mut query = url.query_pairs_mut();
            query.clear();
            let mut replaced = false;
            for (key, value) in &pairs {
                if key == "start" {
                    query.append_pair(key, &start.to_string());
                    replaced = true;
                } else {
                    query.append_pair(key, value);
                }
            }
            if !replaced {
                query.append_pair("start", &start.to_string());
            }
        }
        urls.push(url.to_string());
        start += step;
    }

    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_range_count_and_order() {
        let urls = build_urls_from_range("https://example.com/s?q=rust", 0, 40, 10).unwrap();
        assert_eq!(urls.len(), 5);
        for (i, url) in urls.iter().enumerate() {
            assert!(url.contains(&format!("start={}", i * 10)));
            assert!(url.contains("q=rust"));
        }
    }

    #[test]
    fn test_range_replaces_existing_start() {
        let urls =
            build_urls_from_range("https://example.com/s?q=rust&start=5&hl=en", 0, 10, 10).unwrap();
        assert_eq!(urls.len(), 2);
        // Replaced, not duplicated, and the other parameters survive.
        assert_eq!(urls[0].matches("start=").count(), 1);
        assert_eq!(urls[0], "https://example.com/s?q=rust&start=0&hl=en");
        assert_eq!(urls[1], "https://example.com/s?q=rust&start=10&hl=en");
    }

    #[test]
    fn test_range_appends_when_absent() {
        let urls = build_urls_from_range("https://example.com/s", 20, 20, 10).unwrap();
        assert_eq!(urls, vec!["https://example.com/s?start=20"]);
    }

    #[test]
    fn test_range_preserves_fragment() {
        let urls = build_urls_from_range("https://example.com/p?a=1#results", 0, 0, 1).unwrap();
        assert_eq!(urls, vec!["https://example.com/p?a=1&start=0#results"]);
    }

    #[test]
    fn test_range_rejects_bad_step() {
        assert!(build_urls_from_range("https://example.com", 0, 10, 0).is_err());
    }

    #[test]
    fn test_range_empty_when_inverted() {
        let source = UrlSource::Range {
            base_url: "https://example.com".to_string(),
            from: 10,
            to: 0,
            step: 10,
        };
        assert!(matches!(resolve(&source), Err(CaptureError::NoUrls)));
    }

    #[test]
    fn test_file_mode_trims_and_skips_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  https://example.com/a  ").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "https://example.com/b").unwrap();
        file.flush().unwrap();

        let urls = resolve(&UrlSource::File(file.path().to_path_buf())).unwrap();
        assert_eq!(urls, vec!["https://example.com/a", "https://example.com/b"]);
    }

    #[test]
    fn test_file_mode_empty_is_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = resolve(&UrlSource::File(file.path().to_path_buf()));
        assert!(matches!(result, Err(CaptureError::NoUrls)));
    }
}
