use anyhow::{Context, Result};
use contracts::system::users::User;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

fn user_from_row(row: &sea_orm::QueryResult) -> Result<User> {
    Ok(User {
        id: row.try_get("", "id")?,
        username: row.try_get("", "username")?,
        created_at: row.try_get("", "created_at")?,
        last_login_at: row.try_get("", "last_login_at")?,
    })
}

/// Create user with password hash
pub async fn create_with_password(
    conn: &DatabaseConnection,
    user: &User,
    password_hash: &str,
) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO users (id, username, password_hash, created_at, last_login_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            user.id.clone().into(),
            user.username.clone().into(),
            password_hash.to_string().into(),
            user.created_at.clone().into(),
            user.last_login_at.clone().into(),
        ],
    ))
    .await
    .context("Failed to insert user")?;

    Ok(())
}

pub async fn get_by_id(conn: &DatabaseConnection, id: &str) -> Result<Option<User>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT id, username, created_at, last_login_at FROM users WHERE id = ?",
            [id.into()],
        ))
        .await?;

    result.as_ref().map(user_from_row).transpose()
}

pub async fn get_by_username(conn: &DatabaseConnection, username: &str) -> Result<Option<User>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT id, username, created_at, last_login_at FROM users WHERE username = ?",
            [username.into()],
        ))
        .await?;

    result.as_ref().map(user_from_row).transpose()
}

/// Get password hash for user
pub async fn get_password_hash(conn: &DatabaseConnection, user_id: &str) -> Result<Option<String>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT password_hash FROM users WHERE id = ?",
            [user_id.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row.try_get("", "password_hash")?)),
        None => Ok(None),
    }
}

/// Update last login timestamp
pub async fn update_last_login(conn: &DatabaseConnection, id: &str) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE users SET last_login_at = ? WHERE id = ?",
        [now.into(), id.to_string().into()],
    ))
    .await
    .context("Failed to update last login")?;

    Ok(())
}
