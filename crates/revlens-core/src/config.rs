use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
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
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset.
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("REVLENS_ENV", "development"))?;
    let log_level = or_default("REVLENS_LOG_LEVEL", "info");
    let google_maps_api_key = optional("GOOGLE_MAPS_API_KEY");
    let google_language_api_key = optional("GOOGLE_LANGUAGE_API_KEY");

    let places_base_url = or_default(
        "REVLENS_PLACES_BASE_URL",
        "https://maps.googleapis.com/maps/api/place",
    );
    let language_base_url = or_default(
        "REVLENS_LANGUAGE_BASE_URL",
        "https://language.googleapis.com/v1",
    );

    let request_timeout_secs = parse_u64("REVLENS_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "REVLENS_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("REVLENS_USER_AGENT", "revlens/0.1 (review-sentiment)");

    let pacing_interval_ms = parse_u64("REVLENS_PACING_INTERVAL_MS", "100")?;
    let upstream_max_retries = parse_u32("REVLENS_UPSTREAM_MAX_RETRIES", "3")?;
    let upstream_retry_backoff_ms = parse_u64("REVLENS_UPSTREAM_RETRY_BACKOFF_MS", "1000")?;
    let output_dir = PathBuf::from(or_default("REVLENS_OUTPUT_DIR", "."));

    Ok(AppConfig {
        env,
        log_level,
        google_maps_api_key,
        google_language_api_key,
        places_base_url,
        language_base_url,
        request_timeout_secs,
        user_agent,
        pacing_interval_ms,
        upstream_max_retries,
        upstream_retry_backoff_ms,
        output_dir,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "REVLENS_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
