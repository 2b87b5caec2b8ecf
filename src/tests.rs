#[cfg(test)]
mod integration_tests {
    use crate::{artifact_file_name, CaptureConfig, CaptureError, PaperWidth};
    use std::time::Duration;

    #[test]
    fn test_config_default() {
        let config = CaptureConfig::default();
        assert_eq!(config.paper_width, PaperWidth::A4);
        assert_eq!(config.margin_in, 0.4);
        assert_eq!(config.min_height_in, 1.0);
        assert_eq!(config.max_height_in, 200.0);
        assert_eq!(config.settle_delay, Duration::from_millis(1500));
        assert_eq!(config.min_pacing, Duration::from_secs(2));
        assert_eq!(config.max_pacing, Duration::from_secs(5));
        assert_eq!(config.burst_size, 10);
        assert_eq!(config.cooldown, Duration::from_secs(1));
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.backoff_base, Duration::from_secs(3));
        assert_eq!(config.captcha_timeout, Duration::from_secs(600));
        assert!(config.headless);
        assert!(config.user_data_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_paper_width_presets() {
        assert_eq!(PaperWidth::A4.inches(), 8.27);
        assert_eq!(PaperWidth::Letter.inches(), 8.5);
    }

    #[test]
    fn test_config_rejects_inverted_heights() {
        let config = CaptureConfig {
            min_height_in: 10.0,
            max_height_in: 5.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_inverted_pacing() {
        let config = CaptureConfig {
            min_pacing: Duration::from_secs(5),
            max_pacing: Duration::from_secs(2),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_zero_retries_and_bursts() {
        let config = CaptureConfig {
            retry_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CaptureConfig {
            burst_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = CaptureConfig {
            paper_width: PaperWidth::Letter,
            burst_size: 4,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: CaptureConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.paper_width, PaperWidth::Letter);
        assert_eq!(back.burst_size, 4);
        assert_eq!(back.settle_delay, config.settle_delay);
    }

    #[test]
    fn test_error_retryable() {
        assert!(CaptureError::UrlLoadFailed("test".to_string()).is_retryable());
        assert!(CaptureError::ScriptFailed("test".to_string()).is_retryable());
        assert!(CaptureError::PrintFailed("test".to_string()).is_retryable());
        assert!(!CaptureError::NoUrls.is_retryable());
        assert!(!CaptureError::ConfigurationError("test".to_string()).is_retryable());
        assert!(!CaptureError::NothingToMerge.is_retryable());
    }

    #[test]
    fn test_error_exit_codes_are_distinct() {
        assert_eq!(CaptureError::NoUrls.exit_code(), 1);
        assert_eq!(CaptureError::NothingToMerge.exit_code(), 2);
        assert_ne!(
            CaptureError::NoUrls.exit_code(),
            CaptureError::NothingToMerge.exit_code()
        );
    }

    #[test]
    fn test_artifact_names_follow_sequence_order() {
        let urls = ["https://example.com/a?p=1", "https://example.com/b?p=2"];
        let names: Vec<String> = urls
            .iter()
            .enumerate()
            .map(|(i, url)| artifact_file_name(i + 1, url))
            .collect();
        assert!(names[0].starts_with("001_"));
        assert!(names[1].starts_with("002_"));
        assert!(names.iter().all(|n| n.ends_with(".pdf")));
    }
}
