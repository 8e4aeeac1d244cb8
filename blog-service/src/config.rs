//! Configuration module for environment variable parsing.
//!
//! Both binaries read the same configuration; each uses the fields it needs.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // API Server Configuration
    // =========================================================================

    /// Port for the API server to listen on
    pub port: u16,

    // =========================================================================
    // Worker Configuration
    // =========================================================================

    /// Base URL of the API the worker polls
    pub api_base_url: String,

    /// Seconds to sleep between worker cycles
    pub poll_interval_secs: u64,

    /// Seconds of simulated work spent on each post
    pub processing_delay_secs: u64,

    /// HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            api_base_url: "http://localhost:8080".to_string(),
            poll_interval_secs: 10,
            processing_delay_secs: 10,
            request_timeout_ms: 8000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            port: parse_var("PORT", defaults.port),

            api_base_url: env::var("API_BASE_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_base_url),

            poll_interval_secs: parse_var("POLL_INTERVAL_SECS", defaults.poll_interval_secs),

            processing_delay_secs: parse_var(
                "PROCESSING_DELAY_SECS",
                defaults.processing_delay_secs,
            ),

            request_timeout_ms: parse_var("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn processing_delay(&self) -> Duration {
        Duration::from_secs(self.processing_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Parse a single environment variable, falling back to `default` when it is
/// unset or malformed.
fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_valid() {
        env::set_var("TEST_BLOG_PORT", "9090");
        let result: u16 = parse_var("TEST_BLOG_PORT", 8080);
        assert_eq!(result, 9090);
        env::remove_var("TEST_BLOG_PORT");
    }

    #[test]
    fn test_parse_var_default() {
        let result: u64 = parse_var("NONEXISTENT_BLOG_VAR", 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_parse_var_malformed() {
        env::set_var("TEST_BLOG_INTERVAL", "ten");
        let result: u64 = parse_var("TEST_BLOG_INTERVAL", 10);
        assert_eq!(result, 10);
        env::remove_var("TEST_BLOG_INTERVAL");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.processing_delay(), Duration::from_secs(10));
    }
}
