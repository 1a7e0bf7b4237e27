use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Delay strategy applied between retry attempts of an oracle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffKind {
    /// Retry immediately.
    None,
    /// Sleep the same base delay before every retry.
    Fixed,
    /// Double the base delay on every retry, with jitter.
    Exponential,
}

impl std::fmt::Display for BackoffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackoffKind::None => write!(f, "none"),
            BackoffKind::Fixed => write!(f, "fixed"),
            BackoffKind::Exponential => write!(f, "exponential"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub ollama_url: String,
    pub analysis_model: String,
    pub segregation_model: String,
    pub analysis_num_ctx: u32,
    pub segregation_num_ctx: u32,
    pub analysis_max_tokens: u32,
    pub segregation_max_tokens: u32,
    pub request_timeout_secs: u64,
    pub expansion_max_attempts: u32,
    pub retry_backoff: BackoffKind,
    pub retry_backoff_ms: u64,
    pub filter_batch_size: usize,
    pub inter_batch_delay_ms: u64,
    pub feedback_path: Option<PathBuf>,
}

impl AppConfig {
    /// Whether log output should carry ANSI colors. Only development does.
    #[must_use]
    pub fn log_ansi(&self) -> bool {
        self.env == Environment::Development
    }
}
