//! Configuration Module
//!
//! Handles loading the broker configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::auth::{SalesforceConfig, EXP_DEFAULT_MINUTES};

/// Broker configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Connected app consumer key
    pub iss: String,
    /// Default subject tokens are requested for
    pub sub: String,
    /// Login URL of the org
    pub aud: String,
    /// Path to the PEM encoded RSA private key
    pub private_key_path: String,
    /// Assertion lifetime in minutes
    pub exp_minutes: u32,
    /// Subjects requests may ask for besides `sub`
    pub allowed_subjects: Vec<String>,
    /// Browser origins allowed by CORS
    pub cors_origins: Vec<String>,
    /// Timeout of one token endpoint request in seconds
    pub http_timeout_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SF_ISS` - Consumer key (default: empty)
    /// - `SF_SUB` - Default username (default: empty)
    /// - `SF_AUD` - Login URL (default: https://login.salesforce.com)
    /// - `SF_PRIVATE_KEY_PATH` - Private key file (default: pk.pem)
    /// - `SF_EXP_MINUTES` - Assertion lifetime in minutes (default: 30)
    /// - `SF_ALLOWED_SUBJECTS` - Comma separated extra subjects (default: none)
    /// - `CORS_ALLOWED_ORIGINS` - Comma separated origins (default: none)
    /// - `SF_HTTP_TIMEOUT_SECS` - Token request timeout (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            iss: env::var("SF_ISS").unwrap_or(defaults.iss),
            sub: env::var("SF_SUB").unwrap_or(defaults.sub),
            aud: env::var("SF_AUD").unwrap_or(defaults.aud),
            private_key_path: env::var("SF_PRIVATE_KEY_PATH").unwrap_or(defaults.private_key_path),
            exp_minutes: env::var("SF_EXP_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.exp_minutes),
            allowed_subjects: env::var("SF_ALLOWED_SUBJECTS")
                .map(|v| parse_list(&v))
                .unwrap_or(defaults.allowed_subjects),
            cors_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| parse_list(&v))
                .unwrap_or(defaults.cors_origins),
            http_timeout_secs: env::var("SF_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_timeout_secs),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Builds the credential set for the default subject.
    pub fn credentials(&self, key: impl Into<String>) -> SalesforceConfig {
        SalesforceConfig {
            iss: self.iss.clone(),
            sub: self.sub.clone(),
            aud: self.aud.clone(),
            key: key.into(),
            exp_minutes: self.exp_minutes,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            iss: String::new(),
            sub: String::new(),
            aud: "https://login.salesforce.com".to_string(),
            private_key_path: "pk.pem".to_string(),
            exp_minutes: EXP_DEFAULT_MINUTES,
            allowed_subjects: Vec::new(),
            cors_origins: Vec::new(),
            http_timeout_secs: 30,
        }
    }
}

/// Splits a comma separated list, dropping blank items.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.aud, "https://login.salesforce.com");
        assert_eq!(config.private_key_path, "pk.pem");
        assert_eq!(config.exp_minutes, 30);
        assert!(config.allowed_subjects.is_empty());
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list(" a@example.com, ,b@example.com,"),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SERVER_PORT");
        env::remove_var("SF_AUD");
        env::remove_var("SF_PRIVATE_KEY_PATH");
        env::remove_var("SF_EXP_MINUTES");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.aud, "https://login.salesforce.com");
        assert_eq!(config.exp_minutes, 30);
    }

    #[test]
    fn test_credentials() {
        let config = Config {
            iss: "consumer".to_string(),
            sub: "user@example.com".to_string(),
            ..Config::default()
        };

        let credentials = config.credentials("pem");
        assert_eq!(credentials.iss, "consumer");
        assert_eq!(credentials.sub, "user@example.com");
        assert_eq!(credentials.key, "pem");
        assert_eq!(credentials.exp_minutes, 30);
    }
}
