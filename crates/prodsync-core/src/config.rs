use crate::app_config::{AppConfig, Environment, ProxySettings};
use crate::ConfigError;

/// Browser-like user agent used when `PRODSYNC_USER_AGENT` is not set.
/// The retailer serves a stripped page to obvious bot agents.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or the proxy pair is half-set.
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
/// Returns `ConfigError` if values are invalid or the proxy pair is half-set.
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

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
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

    let env = parse_environment(&or_default("PRODSYNC_ENV", "development"));
    let bind_addr = parse_addr("PRODSYNC_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("PRODSYNC_LOG_LEVEL", "info");

    let search_base_url = or_default("PRODSYNC_SEARCH_BASE_URL", "https://www.walmart.com");
    if !search_base_url.starts_with("http://") && !search_base_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRODSYNC_SEARCH_BASE_URL".to_string(),
            reason: format!("\"{search_base_url}\" is not an http(s) origin"),
        });
    }

    let fetch_timeout_secs = parse_u64("PRODSYNC_FETCH_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PRODSYNC_USER_AGENT", DEFAULT_USER_AGENT);
    let inter_page_delay_ms = parse_u64("PRODSYNC_INTER_PAGE_DELAY_MS", "500")?;

    let proxy_endpoint = lookup("PRODSYNC_PROXY_ENDPOINT").ok();
    let proxy_api_key = lookup("PRODSYNC_PROXY_API_KEY").ok();
    let proxy = match (proxy_endpoint, proxy_api_key) {
        (Some(endpoint), Some(api_key)) => Some(ProxySettings { endpoint, api_key }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(ConfigError::MissingEnvVar(
                "PRODSYNC_PROXY_API_KEY".to_string(),
            ));
        }
        (None, Some(_)) => {
            return Err(ConfigError::MissingEnvVar(
                "PRODSYNC_PROXY_ENDPOINT".to_string(),
            ));
        }
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        search_base_url,
        fetch_timeout_secs,
        user_agent,
        inter_page_delay_ms,
        proxy,
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

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
