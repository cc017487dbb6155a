use axum::extract::{Query, State};
use axum::Json;
use contracts::dashboards::weekly_report::{WeeklyReportRequest, WeeklyReportResponse};

use crate::dashboards::weekly_report::service;
use crate::shared::error::ApiError;
use crate::shared::state::AppState;

/// GET /api/reports/weekly?weekStart=YYYY-MM-DD
///
/// Omitting `weekStart` selects the current week; a future week is clamped
/// back to the week containing today.
pub async fn weekly(
    State(state): State<AppState>,
    Query(query): Query<WeeklyReportRequest>,
) -> Result<Json<WeeklyReportResponse>, ApiError> {
    let report = service::get_weekly_report(&state.db, query.week_start).await?;
    Ok(Json(report))
}
