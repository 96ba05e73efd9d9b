use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parses and validates configuration from an arbitrary env-var lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
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

    let database_url = require("DATABASE_URL")?;
    let serp_api_key = require("SERPAPI_API_KEY")?;

    let env = parse_environment(&or_default("PLACEPULSE_ENV", "development"));
    let bind_addr = parse_addr("PLACEPULSE_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("PLACEPULSE_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("PLACEPULSE_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("PLACEPULSE_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("PLACEPULSE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let serp_base_url = or_default("PLACEPULSE_SERP_BASE_URL", "https://serpapi.com/search.json");
    let serp_timeout_secs = parse_u64("PLACEPULSE_SERP_TIMEOUT_SECS", "30")?;
    if serp_timeout_secs == 0 {
        return Err(invalid(
            "PLACEPULSE_SERP_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let serp_locale = or_default("PLACEPULSE_SERP_LOCALE", "en");
    let serp_country = or_default("PLACEPULSE_SERP_COUNTRY", "in");

    let list_limit = parse_u32("PLACEPULSE_LIST_LIMIT", "50")?;
    if list_limit == 0 {
        return Err(invalid(
            "PLACEPULSE_LIST_LIMIT",
            "must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        serp_api_key,
        serp_base_url,
        serp_timeout_secs,
        serp_locale,
        serp_country,
        list_limit: i64::from(list_limit),
    })
}

/// Unrecognized values fall back to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
