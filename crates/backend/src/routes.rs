use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::shared::state::AppState;
use crate::{handlers, system};

/// All application routes.
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // AUTH ROUTES
        // ========================================
        .route("/api/auth/login", post(system::handlers::auth::login))
        .route("/api/auth/logout", post(system::handlers::auth::logout))
        .route("/api/auth/register", post(system::handlers::auth::register))
        .route(
            "/api/auth/user",
            get(system::handlers::auth::current_user).layer(middleware::from_fn_with_state(
                state.clone(),
                system::auth::middleware::require_auth,
            )),
        )
        // ========================================
        // INVOICE LIFECYCLE
        // ========================================
        .route(
            "/api/invoices",
            get(handlers::invoices::list)
                .post(handlers::invoices::create)
                .put(handlers::invoices::update_delivery_status)
                .delete(handlers::invoices::delete),
        )
        .route(
            "/api/invoices/delivered",
            get(handlers::invoices::list_delivered),
        )
        // ========================================
        // REPORTING
        // ========================================
        .route("/api/reports/weekly", get(handlers::reports::weekly))
        .with_state(state)
}
