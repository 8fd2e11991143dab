use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let in_range = |var: &str, value: usize, lo: usize, hi: usize| -> Result<usize, ConfigError> {
        if (lo..=hi).contains(&value) {
            Ok(value)
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("must be between {lo} and {hi}"),
            })
        }
    };

    let env = parse_environment(&or_default("PULSO_ENV", "development"));

    let bind_addr = parse("PULSO_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("PULSO_LOG_LEVEL", "info");
    let max_upload_bytes = parse_usize("PULSO_MAX_UPLOAD_BYTES", "10485760")?;

    let min_token_len = in_range(
        "PULSO_MIN_TOKEN_LEN",
        parse_usize("PULSO_MIN_TOKEN_LEN", "3")?,
        3,
        4,
    )?;
    let top_n = in_range("PULSO_TOP_N", parse_usize("PULSO_TOP_N", "3")?, 1, 4)?;
    let min_sector_sample = parse_u64("PULSO_MIN_SECTOR_SAMPLE", "3")?;

    let summary_api_key = lookup("PULSO_SUMMARY_API_KEY").ok();
    let summary_base_url = or_default(
        "PULSO_SUMMARY_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let summary_model = or_default("PULSO_SUMMARY_MODEL", "gemini-1.5-flash");
    let summary_timeout_secs = parse_u64("PULSO_SUMMARY_TIMEOUT_SECS", "20")?;
    let summary_max_comments = parse_usize("PULSO_SUMMARY_MAX_COMMENTS", "40")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        max_upload_bytes,
        min_token_len,
        top_n,
        min_sector_sample,
        summary_api_key,
        summary_base_url,
        summary_model,
        summary_timeout_secs,
        summary_max_comments,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
