use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::error::ApiError;
use crate::shared::state::AppState;

/// Name of the session cookie set at login.
pub const TOKEN_COOKIE: &str = "token";

/// Middleware that requires a valid session token in the `token` cookie.
/// Validated claims are stored in request extensions for the handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie_header = req
        .headers()
        .get(axum::http::header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("No token found".into()))?;

    let token = token_from_cookie_header(cookie_header)
        .ok_or_else(|| ApiError::Unauthorized("No token found".into()))?;

    let claims = super::jwt::validate_token(&state.token_secret, token)
        .map_err(|_| ApiError::Unauthorized("Invalid token".into()))?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Pull the session token out of a Cookie header value.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == TOKEN_COOKIE && !value.is_empty() {
            Some(value)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::token_from_cookie_header;

    #[test]
    fn finds_token_among_other_cookies() {
        assert_eq!(
            token_from_cookie_header("theme=dark; token=abc.def.ghi; lang=en"),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn missing_or_empty_token_is_none() {
        assert_eq!(token_from_cookie_header("theme=dark"), None);
        assert_eq!(token_from_cookie_header("token="), None);
        assert_eq!(token_from_cookie_header(""), None);
    }

    #[test]
    fn does_not_match_prefixed_names() {
        assert_eq!(token_from_cookie_header("refresh_token=zzz"), None);
    }
}
