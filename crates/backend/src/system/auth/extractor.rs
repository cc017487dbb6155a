use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use contracts::system::auth::TokenClaims;

use crate::shared::error::ApiError;

/// Extractor for the current session's claims, placed into request
/// extensions by `require_auth`.
/// Usage: `async fn handler(CurrentUser(claims): CurrentUser) -> …`
pub struct CurrentUser(pub TokenClaims);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::Unauthorized("No token found".into()))
    }
}
