//! Shared data model and configuration for postsift.
//!
//! Holds the normalized [`Post`] record produced by acquisition, the
//! environment-driven [`AppConfig`], and the file-backed read models
//! (post archives and historical rating feedback) used by the CLI.

mod app_config;
mod config;
pub mod feedback;
pub mod posts;

use thiserror::Error;

pub use app_config::{AppConfig, BackoffKind, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use feedback::{load_feedback, FeedbackEntry, FeedbackFile, RatingInsight};
pub use posts::{load_post_archive, Platform, Post, PostArchive, SearchRequest, TimeFilter};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse feedback file: {0}")]
    FeedbackFileParse(#[from] serde_yaml::Error),

    #[error("failed to parse post archive {path}: {source}")]
    PostArchiveParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}
