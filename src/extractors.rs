use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{names, rejections::AppError, AppState};

/// Guard extractor carrying the authenticated user's id, taken from the
/// header the fronting auth layer sets. Requests without a valid id are
/// rejected before any handler runs.
pub struct AuthGuard(pub i32);

impl FromRequestParts<AppState> for AuthGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(names::USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i32>().ok())
            .map(AuthGuard)
            .ok_or(AppError::Unauthorized)
    }
}
