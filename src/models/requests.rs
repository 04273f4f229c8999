//! Request DTOs for the token broker API
//!
//! Defines the query parameters accepted by the token endpoints.

use serde::Deserialize;

use crate::auth::SalesforceConfig;

/// Query string of `GET /token` and `DELETE /token`
///
/// # Fields
/// - `sub`: Optional username overriding the configured subject; must be on
///   the broker's allow-list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    pub sub: Option<String>,
}

impl TokenQuery {
    /// Validates the query
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match &self.sub {
            Some(sub) if sub.trim().is_empty() => Some("Subject cannot be blank".to_string()),
            Some(sub) if sub.len() > 256 => {
                Some("Subject exceeds maximum length of 256 characters".to_string())
            }
            _ => None,
        }
    }

    /// Whether the query names a subject other than the configured one.
    pub fn overrides(&self, base: &SalesforceConfig) -> Option<&str> {
        self.sub.as_deref().filter(|sub| *sub != base.sub)
    }

    /// Applies the subject override to the base credentials.
    pub fn apply(&self, base: &SalesforceConfig) -> SalesforceConfig {
        let mut config = base.clone();
        if let Some(sub) = &self.sub {
            config.sub = sub.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SalesforceConfig {
        SalesforceConfig {
            iss: "iss".to_string(),
            sub: "default@example.com".to_string(),
            aud: "https://login.salesforce.com".to_string(),
            key: "pem".to_string(),
            exp_minutes: 30,
        }
    }

    #[test]
    fn test_token_query_deserialize() {
        let query: TokenQuery = serde_json::from_str(r#"{"sub": "other@example.com"}"#).unwrap();
        assert_eq!(query.sub.as_deref(), Some("other@example.com"));

        let empty: TokenQuery = serde_json::from_str("{}").unwrap();
        assert!(empty.sub.is_none());
    }

    #[test]
    fn test_validate_blank_sub() {
        let query = TokenQuery {
            sub: Some("  ".to_string()),
        };
        assert!(query.validate().is_some());
    }

    #[test]
    fn test_overrides() {
        assert_eq!(TokenQuery::default().overrides(&base()), None);

        let same = TokenQuery {
            sub: Some("default@example.com".to_string()),
        };
        assert_eq!(same.overrides(&base()), None);

        let other = TokenQuery {
            sub: Some("other@example.com".to_string()),
        };
        assert_eq!(other.overrides(&base()), Some("other@example.com"));
    }

    #[test]
    fn test_apply_overrides_subject_only() {
        let query = TokenQuery {
            sub: Some("other@example.com".to_string()),
        };
        let config = query.apply(&base());
        assert_eq!(config.sub, "other@example.com");
        assert_eq!(config.iss, "iss");

        assert_eq!(TokenQuery::default().apply(&base()), base());
    }
}
