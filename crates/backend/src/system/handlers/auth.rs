use axum::extract::{Json, State};
use axum::http::header;
use axum::response::AppendHeaders;
use contracts::system::auth::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, SessionInfo,
};

use crate::shared::error::ApiError;
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::jwt;
use crate::system::auth::middleware::TOKEN_COOKIE;
use crate::system::users::service as user_service;

type SetCookie = AppendHeaders<[(header::HeaderName, String); 1]>;

fn session_cookie(token: &str) -> SetCookie {
    AppendHeaders([(
        header::SET_COOKIE,
        format!(
            "{TOKEN_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
            jwt::COOKIE_MAX_AGE_SECONDS
        ),
    )])
}

fn clear_cookie() -> SetCookie {
    AppendHeaders([(
        header::SET_COOKIE,
        format!("{TOKEN_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0"),
    )])
}

/// POST /api/auth/login
///
/// A single generic message covers both unknown usernames and wrong
/// passwords, so the response does not reveal which check failed.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(SetCookie, Json<LoginResponse>), ApiError> {
    let user = user_service::verify_credentials(&state.db, &request.username, &request.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".into()))?;

    let token = jwt::generate_token(&state.token_secret, &user.id, &user.username)?;

    Ok((
        session_cookie(&token),
        Json(LoginResponse {
            message: "Logged in successfully".into(),
            username: user.username,
        }),
    ))
}

/// POST /api/auth/logout
pub async fn logout() -> (SetCookie, Json<MessageResponse>) {
    (
        clear_cookie(),
        Json(MessageResponse {
            message: "Logged out successfully".into(),
        }),
    )
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    user_service::register(&state.db, request).await?;
    Ok(Json(MessageResponse {
        message: "User registered successfully".into(),
    }))
}

/// GET /api/auth/user — session check, behind `require_auth`.
pub async fn current_user(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<SessionInfo>, ApiError> {
    let user = user_service::get_by_id(&state.db, &claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid token".into()))?;

    Ok(Json(SessionInfo {
        username: user.username,
        id: user.id,
    }))
}
