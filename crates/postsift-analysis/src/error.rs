use thiserror::Error;

/// Failures of a single inference call.
///
/// Stages treat every variant except [`OracleError::Cancelled`] the same way;
/// the distinction exists for logging.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle unreachable at {url}: {reason}")]
    Unavailable { url: String, reason: String },

    #[error("oracle request to {url} timed out")]
    Timeout { url: String },

    #[error("oracle returned HTTP {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    BadStatus { status: u16, message: Option<String> },

    #[error("oracle response is missing the `{field}` text field")]
    MalformedResponse { field: &'static str },

    #[error("oracle call cancelled")]
    Cancelled,
}

/// Failures of an analysis stage.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Oracle(OracleError),

    #[error("could not recover JSON from oracle response: {0}")]
    Extraction(String),

    #[error("oracle response failed validation: {0}")]
    Validation(String),

    #[error("analysis cancelled")]
    Cancelled,

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl AnalysisError {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AnalysisError::Cancelled)
    }
}

impl From<OracleError> for AnalysisError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::Cancelled => AnalysisError::Cancelled,
            other => AnalysisError::Oracle(other),
        }
    }
}
