use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

/// Open the SQLite database at `db_path`, creating the file and parent
/// directories as needed. The connection is created once at process start and
/// handed to the service layer through `AppState`; nothing here is global.
pub async fn connect(db_path: &str) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = std::path::Path::new(db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_path).is_absolute() {
        std::path::PathBuf::from(db_path)
    } else {
        std::env::current_dir()?.join(db_path)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    let conn = Database::connect(&db_url).await?;
    Ok(conn)
}

/// Minimal schema bootstrap: creates the two collections when they do not
/// exist yet. Card-number uniqueness lives in the schema itself so that
/// duplicate creation fails atomically inside the insert, not in a separate
/// read-then-write check.
pub async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let invoices_exists = table_exists(conn, "invoices").await?;
    if !invoices_exists {
        tracing::info!("Creating invoices table");
        let create_invoices_sql = r#"
            CREATE TABLE invoices (
                id TEXT PRIMARY KEY NOT NULL,
                card_number TEXT NOT NULL UNIQUE,
                customer_name TEXT NOT NULL DEFAULT '',
                phone_number TEXT NOT NULL DEFAULT '',
                selected_date TEXT NOT NULL,
                today TEXT NOT NULL,
                advance REAL NOT NULL DEFAULT 0,
                rows TEXT NOT NULL DEFAULT '[]',
                is_delivered INTEGER NOT NULL DEFAULT 0,
                delivered_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_invoices_sql.to_string(),
        ))
        .await?;
    }

    let users_exists = table_exists(conn, "users").await?;
    if !users_exists {
        tracing::info!("Creating users table");
        let create_users_sql = r#"
            CREATE TABLE users (
                id TEXT PRIMARY KEY NOT NULL,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL,
                last_login_at TEXT
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_users_sql.to_string(),
        ))
        .await?;
    }

    Ok(())
}

async fn table_exists(conn: &DatabaseConnection, name: &str) -> anyhow::Result<bool> {
    let rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type='table' AND name=?",
            [name.into()],
        ))
        .await?;
    Ok(!rows.is_empty())
}

/// In-memory database with the full schema applied; test helper. The pool is
/// capped at one connection because every pooled connection to
/// `sqlite::memory:` would otherwise see its own empty database.
#[cfg(test)]
pub async fn connect_for_tests() -> DatabaseConnection {
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1);
    let conn = Database::connect(options).await.expect("in-memory sqlite");
    bootstrap_schema(&conn).await.expect("bootstrap schema");
    conn
}
