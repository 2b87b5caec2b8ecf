use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("No URLs to process")]
    NoUrls,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Browser launch failed: {0}")]
    BrowserLaunchFailed(String),

    #[error("URL loading failed: {0}")]
    UrlLoadFailed(String),

    #[error("Script evaluation failed: {0}")]
    ScriptFailed(String),

    #[error("PDF print failed: {0}")]
    PrintFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("PDF parse error: {0}")]
    PdfError(String),

    #[error("No PDFs were created; nothing to merge")]
    NothingToMerge,
}

impl CaptureError {
    /// Transient browser-control failures are retried by the run loop;
    /// everything else aborts or is reported once.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CaptureError::UrlLoadFailed(_)
                | CaptureError::ScriptFailed(_)
                | CaptureError::PrintFailed(_)
                | CaptureError::IoError(_)
        )
    }

    /// Process exit code for run-level failures. "No input" and "no
    /// output" are distinct conditions.
    pub fn exit_code(&self) -> i32 {
        match self {
            CaptureError::NothingToMerge => 2,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::IoError(err.to_string())
    }
}

impl From<lopdf::Error> for CaptureError {
    fn from(err: lopdf::Error) -> Self {
        CaptureError::PdfError(err.to_string())
    }
}
