//! Bearer token authentication extractor

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AuthState;
use crate::api::types::ApiError;
use crate::domain::user::UserId;

/// The only message a client ever sees for a rejected token
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or missing token";

/// Extractor that requires `Authorization: Bearer <token>`
///
/// Resolves to the identifier the token was issued for. The credential
/// store is never consulted. Every failure yields the same 401 body.
#[derive(Debug, Clone, Copy)]
pub struct RequireUser(pub UserId);

impl FromRequestParts<AuthState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AuthState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized(INVALID_TOKEN_MESSAGE))?;

        let user_id = state.token_service.verify(token).map_err(|e| {
            debug!(reason = %e, "Rejected bearer token");
            ApiError::unauthorized(INVALID_TOKEN_MESSAGE)
        })?;

        Ok(RequireUser(user_id))
    }
}

/// Extract a non-empty bearer token from the Authorization header
///
/// The scheme name is matched case-insensitively (RFC 7235).
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim_start().split_once(char::is_whitespace)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        None
    } else {
        Some(token)
    }
}
