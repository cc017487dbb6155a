use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use contracts::domain::invoices::aggregate::CreateInvoiceDto;

use crate::domain::invoices::service;
use crate::shared::error::ApiError;
use crate::shared::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceListQuery {
    pub card_number: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub enum DeliveryAction {
    #[serde(rename = "deliver")]
    Deliver,
    #[serde(rename = "unDeliver")]
    UnDeliver,
}

#[derive(Debug, Deserialize)]
pub struct DeliveryQuery {
    pub id: Uuid,
    pub action: DeliveryAction,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: Uuid,
}

/// GET /api/invoices
///
/// Dispatches on query parameters, mirroring the original endpoint:
/// `?cardNumber=X` returns one invoice, `?phoneNumber=X` returns distinct
/// matching phone numbers for autocomplete, no parameters returns everything
/// newest-first.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<InvoiceListQuery>,
) -> Result<Response, ApiError> {
    if let Some(card_number) = query.card_number {
        let invoice = service::get_by_card_number(&state.db, &card_number).await?;
        return Ok(Json(invoice).into_response());
    }

    if let Some(fragment) = query.phone_number {
        let numbers = service::search_phone_numbers(&state.db, &fragment).await?;
        return Ok(Json(numbers).into_response());
    }

    let invoices = service::list_all(&state.db).await?;
    Ok(Json(invoices).into_response())
}

/// GET /api/invoices/delivered
pub async fn list_delivered(State(state): State<AppState>) -> Result<Response, ApiError> {
    let invoices = service::list_delivered(&state.db).await?;
    Ok(Json(invoices).into_response())
}

/// POST /api/invoices
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateInvoiceDto>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = service::create(&state.db, dto).await?;
    Ok(Json(json!({ "msg": "Invoice Created", "id": id.to_string() })))
}

/// PUT /api/invoices?id=ID&action=deliver|unDeliver
pub async fn update_delivery_status(
    State(state): State<AppState>,
    Query(query): Query<DeliveryQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deliver = matches!(query.action, DeliveryAction::Deliver);
    service::set_delivery_status(&state.db, query.id, deliver).await?;

    let msg = if deliver {
        "Invoice Marked as Delivered"
    } else {
        "Invoice Marked as Undelivered"
    };
    Ok(Json(json!({ "msg": msg })))
}

/// DELETE /api/invoices?id=ID
pub async fn delete(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    service::delete(&state.db, query.id).await?;
    Ok(Json(json!({ "msg": "Invoice Deleted" })))
}
