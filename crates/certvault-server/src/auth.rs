//! Caller context extracted from request headers.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use certvault_core::{Credentials, Error};

/// Header naming the owner for certificate creation (`OwnerID` on the wire).
pub const OWNER_HEADER: &str = "ownerid";

/// Decode HTTP Basic credentials from the `Authorization` header.
///
/// Missing, non-Basic or undecodable headers all yield `Unauthenticated`.
pub fn basic_credentials(headers: &HeaderMap) -> Result<Credentials, Error> {
    let encoded = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .ok_or(Error::Unauthenticated)?;

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| Error::Unauthenticated)?;
    let decoded = String::from_utf8(decoded).map_err(|_| Error::Unauthenticated)?;

    let (id, secret) = decoded.split_once(':').ok_or(Error::Unauthenticated)?;
    Ok(Credentials::new(id, secret))
}

/// Owner context from the `OwnerID` header, if present and non-empty.
pub fn owner_context(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(OWNER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
