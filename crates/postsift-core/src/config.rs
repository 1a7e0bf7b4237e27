use crate::app_config::{AppConfig, BackoffKind, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; only malformed values are rejected. Kept
/// separate from the process environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("POSTSIFT_ENV", "development"))?;
    let log_level = or_default("POSTSIFT_LOG_LEVEL", "info");

    let ollama_url = or_default("POSTSIFT_OLLAMA_URL", "http://localhost:11434");
    if !(ollama_url.starts_with("http://") || ollama_url.starts_with("https://")) {
        return Err(invalid(
            "POSTSIFT_OLLAMA_URL",
            format!("'{ollama_url}' must start with http:// or https://"),
        ));
    }

    let analysis_model = or_default("POSTSIFT_ANALYSIS_MODEL", "llama3.2:3b");
    let segregation_model = or_default("POSTSIFT_SEGREGATION_MODEL", "llama3.2:3b");
    let analysis_num_ctx = parse_u32("POSTSIFT_ANALYSIS_NUM_CTX", "4096")?;
    let segregation_num_ctx = parse_u32("POSTSIFT_SEGREGATION_NUM_CTX", "8192")?;
    let analysis_max_tokens = parse_u32("POSTSIFT_ANALYSIS_MAX_TOKENS", "1024")?;
    let segregation_max_tokens = parse_u32("POSTSIFT_SEGREGATION_MAX_TOKENS", "2048")?;
    let request_timeout_secs = parse_u64("POSTSIFT_REQUEST_TIMEOUT_SECS", "120")?;

    let expansion_max_attempts = parse_u32("POSTSIFT_EXPANSION_MAX_ATTEMPTS", "3")?;
    if expansion_max_attempts == 0 {
        return Err(invalid(
            "POSTSIFT_EXPANSION_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }
    let retry_backoff = parse_backoff(&or_default("POSTSIFT_RETRY_BACKOFF", "fixed"))?;
    let retry_backoff_ms = parse_u64("POSTSIFT_RETRY_BACKOFF_MS", "1000")?;

    let filter_batch_size = parse_usize("POSTSIFT_FILTER_BATCH_SIZE", "50")?;
    if filter_batch_size == 0 {
        return Err(invalid(
            "POSTSIFT_FILTER_BATCH_SIZE",
            "must be at least 1".to_string(),
        ));
    }
    let inter_batch_delay_ms = parse_u64("POSTSIFT_INTER_BATCH_DELAY_MS", "1000")?;

    let feedback_path = lookup("POSTSIFT_FEEDBACK_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        ollama_url: ollama_url.trim_end_matches('/').to_string(),
        analysis_model,
        segregation_model,
        analysis_num_ctx,
        segregation_num_ctx,
        analysis_max_tokens,
        segregation_max_tokens,
        request_timeout_secs,
        expansion_max_attempts,
        retry_backoff,
        retry_backoff_ms,
        filter_batch_size,
        inter_batch_delay_ms,
        feedback_path,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "POSTSIFT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_backoff(s: &str) -> Result<BackoffKind, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "none" => Ok(BackoffKind::None),
        "fixed" => Ok(BackoffKind::Fixed),
        "exponential" => Ok(BackoffKind::Exponential),
        other => Err(ConfigError::InvalidEnvVar {
            var: "POSTSIFT_RETRY_BACKOFF".to_string(),
            reason: format!("unknown backoff '{other}'; expected none, fixed or exponential"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
