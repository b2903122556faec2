use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::domain::{ApiError, TokenClaims};

/// Decodes a JWT payload **without verifying its signature**.
///
/// The result is display-only convenience (prefill a profile name, pick the
/// user id for a refresh request) and must never feed an authorization
/// decision; only the auth backend can vouch for a token. Anyone can mint a
/// token this function will happily decode.
pub fn peek_claims(token: &str) -> Result<TokenClaims, ApiError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(ApiError::token("Token is not a three-segment JWT"));
    };

    let decoded = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| ApiError::token(format!("Token payload is not base64url: {e}")))?;

    serde_json::from_slice(&decoded)
        .map_err(|e| ApiError::token(format!("Token payload is not a JSON object: {e}")))
}
