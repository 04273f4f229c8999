//! Credential validation and JWT claim construction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

/// Assertion lifetime used when the credentials do not specify one.
pub const EXP_DEFAULT_MINUTES: u32 = 30;

fn default_exp_minutes() -> u32 {
    EXP_DEFAULT_MINUTES
}

// == Salesforce Config ==
/// Credentials for one connected-app user.
///
/// The whole value, private key included, is the memoization key of the
/// token fetcher, so two configs share a token only if every field matches.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesforceConfig {
    /// Connected app consumer key
    pub iss: String,
    /// Username the token is issued for
    pub sub: String,
    /// Login URL, also the base URL of the token endpoint
    pub aud: String,
    /// PEM encoded RSA private key
    pub key: String,
    /// Assertion lifetime in minutes
    #[serde(default = "default_exp_minutes")]
    pub exp_minutes: u32,
}

impl fmt::Debug for SalesforceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SalesforceConfig")
            .field("iss", &self.iss)
            .field("sub", &self.sub)
            .field("aud", &self.aud)
            .field("key", &"<redacted>")
            .field("exp_minutes", &self.exp_minutes)
            .finish()
    }
}

// == Claims ==
/// JWT payload of the bearer assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    /// Expiry as Unix seconds
    pub exp: i64,
}

/// Checks the required fields and builds the assertion claims.
///
/// Every missing field among `iss`, `sub` and `aud` is reported at once.
pub fn validate_config(config: &SalesforceConfig) -> Result<Claims> {
    let required = [
        ("iss", &config.iss),
        ("sub", &config.sub),
        ("aud", &config.aud),
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();

    if !missing.is_empty() {
        return Err(AuthError::ParameterValidation(format!(
            "Missing required payload properties: {}",
            missing.join(", ")
        )));
    }

    Ok(Claims {
        iss: config.iss.clone(),
        sub: config.sub.clone(),
        aud: config.aud.clone(),
        exp: chrono::Utc::now().timestamp() + 60 * i64::from(config.exp_minutes),
    })
}
