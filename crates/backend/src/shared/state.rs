use sea_orm::DatabaseConnection;

/// Process-wide dependencies, constructed once in `main` and injected into
/// handlers through axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub token_secret: String,
}

impl AppState {
    pub fn new(db: DatabaseConnection, token_secret: String) -> Self {
        Self { db, token_secret }
    }
}
