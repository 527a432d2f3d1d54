//! Bearer-token check for scanner operators.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use galaxy_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Marker extractor for handlers that require an operator token.
///
/// When `API_TOKEN` is unset every request passes; otherwise the request
/// must carry `Authorization: Bearer <API_TOKEN>`.
#[derive(Debug, Clone, Copy)]
pub struct OperatorAuth;

impl FromRequestParts<AppState> for OperatorAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.api_token.as_deref() else {
            return Ok(OperatorAuth);
        };

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        if !tokens_match(token.as_bytes(), expected.as_bytes()) {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid operator token".into(),
            )));
        }
        Ok(OperatorAuth)
    }
}

/// Compare without short-circuiting on the first differing byte.
fn tokens_match(given: &[u8], expected: &[u8]) -> bool {
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
