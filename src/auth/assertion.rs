//! RS256 bearer assertion signing.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::auth::Claims;
use crate::error::{AuthError, Result};

/// Signs `claims` with the PEM encoded RSA `private_key`.
///
/// The header carries only `alg: RS256`.
pub fn sign_assertion(claims: &Claims, private_key: &str) -> Result<String> {
    let signature_error = |e: jsonwebtoken::errors::Error| {
        AuthError::Signature(format!("Unable to sign JWT: {e}. Check key validity."))
    };

    let key = EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(signature_error)?;

    let mut header = Header::new(Algorithm::RS256);
    header.typ = None;

    encode(&header, claims, &key).map_err(signature_error)
}
