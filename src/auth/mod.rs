//! Auth Module
//!
//! OAuth 2.0 JWT-bearer token flow: validate the credentials, sign an RS256
//! assertion, exchange it at the token endpoint. The exchange is memoized per
//! credential set so a token is reused until shortly before it expires.

mod assertion;
mod claims;
mod token;
mod transport;

pub use assertion::sign_assertion;
pub use claims::{validate_config, Claims, SalesforceConfig, EXP_DEFAULT_MINUTES};
pub use token::{
    create_get_token, fetch_token, token_ttl, token_url, TokenFetcher, TokenOutput,
    TOKEN_ENDPOINT, TOKEN_GRANT_TYPE,
};
pub use transport::{HttpTransport, TokenTransport, TransportResponse};
