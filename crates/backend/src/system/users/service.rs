use chrono::Utc;
use contracts::system::auth::RegisterRequest;
use contracts::system::users::User;
use sea_orm::DatabaseConnection;

use super::repository;
use crate::shared::error::ApiError;
use crate::system::auth::password;

/// Register a new credential record. Duplicate usernames are a conflict; the
/// UNIQUE index on username backstops the pre-check.
pub async fn register(conn: &DatabaseConnection, dto: RegisterRequest) -> Result<String, ApiError> {
    if dto.username.trim().is_empty() {
        return Err(ApiError::Validation("Username cannot be empty".into()));
    }
    if dto.password.is_empty() {
        return Err(ApiError::Validation("Password cannot be empty".into()));
    }

    if repository::get_by_username(conn, &dto.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let password_hash = password::hash_password(&dto.password)?;

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: dto.username,
        created_at: Utc::now().to_rfc3339(),
        last_login_at: None,
    };

    repository::create_with_password(conn, &user, &password_hash).await?;

    Ok(user.id)
}

/// Check a username/password pair. Returns the user on success and `None` on
/// any mismatch; callers must not reveal which of the two checks failed.
pub async fn verify_credentials(
    conn: &DatabaseConnection,
    username: &str,
    plain_password: &str,
) -> Result<Option<User>, ApiError> {
    let Some(user) = repository::get_by_username(conn, username).await? else {
        return Ok(None);
    };

    let Some(stored_hash) = repository::get_password_hash(conn, &user.id).await? else {
        return Ok(None);
    };

    if !password::verify_password(plain_password, &stored_hash) {
        return Ok(None);
    }

    repository::update_last_login(conn, &user.id).await?;

    Ok(Some(user))
}

pub async fn get_by_id(conn: &DatabaseConnection, id: &str) -> Result<Option<User>, ApiError> {
    Ok(repository::get_by_id(conn, id).await?)
}
