//! Authenticated user extraction from the `Authorization` header.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use notes_core::User;

use crate::error::ApiError;
use crate::identity::VerifyError;
use crate::state::AppState;

/// The local user behind the request's bearer token.
///
/// Extraction runs the whole authentication pipeline:
/// 1. Read the token from `Authorization`. A `Bearer` scheme, in any case,
///    is optional.
/// 2. Verify it with the configured identity verifier.
/// 3. Load the user record for the verified uid.
///
/// Any failure rejects the request before the handler body runs.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let user = state.service().authenticate(token).await?;
        Ok(CurrentUser(user))
    }
}

/// The token carried by the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(VerifyError::MissingToken)?
        .to_str()
        .map_err(|_| {
            ApiError::AuthFailure("Authorization header contains invalid characters".into())
        })?;

    let token = strip_bearer_scheme(value).trim();
    if token.is_empty() {
        return Err(VerifyError::MissingToken.into());
    }
    Ok(token)
}

/// Drop a leading `Bearer` scheme, matched case-insensitively. A header
/// without a scheme is taken to be the token itself.
fn strip_bearer_scheme(value: &str) -> &str {
    match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest,
        _ => value,
    }
}
