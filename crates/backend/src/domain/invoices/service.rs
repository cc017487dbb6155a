use chrono::Utc;
use contracts::domain::invoices::aggregate::{CreateInvoiceDto, Invoice, InvoiceId};
use sea_orm::{DatabaseConnection, SqlErr};
use uuid::Uuid;

use super::repository;
use crate::shared::error::ApiError;

/// Create an invoice from the client payload. Card number and delivery date
/// are mandatory; row totals are recomputed server-side and a mismatch is
/// rejected rather than trusted. Duplicate card numbers surface as a conflict
/// straight from the storage-level uniqueness constraint.
pub async fn create(conn: &DatabaseConnection, dto: CreateInvoiceDto) -> Result<Uuid, ApiError> {
    dto.validate().map_err(ApiError::Validation)?;

    let now = Utc::now();
    let aggregate = Invoice {
        id: InvoiceId::new_v4(),
        card_number: dto.card_number.trim().to_string(),
        customer_name: dto.customer_name,
        phone_number: dto.phone_number,
        // validate() guarantees the date is present
        selected_date: dto
            .selected_date
            .ok_or_else(|| ApiError::Validation("Delivery date is required".into()))?,
        today: dto.today.unwrap_or(now),
        advance: dto.advance,
        rows: dto.rows,
        is_delivered: false,
        delivered_at: None,
        created_at: now,
        updated_at: now,
    };

    match repository::insert(conn, &aggregate).await {
        Ok(id) => Ok(id),
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(ApiError::Conflict(
                "An invoice with this card number already exists".into(),
            )),
            _ => Err(ApiError::Internal(err.into())),
        },
    }
}

pub async fn list_all(conn: &DatabaseConnection) -> Result<Vec<Invoice>, ApiError> {
    Ok(repository::list_all(conn).await?)
}

pub async fn list_delivered(conn: &DatabaseConnection) -> Result<Vec<Invoice>, ApiError> {
    Ok(repository::list_delivered(conn).await?)
}

pub async fn get_by_card_number(
    conn: &DatabaseConnection,
    card_number: &str,
) -> Result<Invoice, ApiError> {
    repository::get_by_card_number(conn, card_number)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invoice not found".into()))
}

/// Distinct phone numbers for autocomplete; an empty fragment matches nothing
/// rather than returning the whole phone book.
pub async fn search_phone_numbers(
    conn: &DatabaseConnection,
    fragment: &str,
) -> Result<Vec<String>, ApiError> {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return Ok(Vec::new());
    }
    Ok(repository::search_phone_numbers(conn, fragment).await?)
}

/// Toggle delivery. Delivering stamps `delivered_at` with the current time;
/// reverting clears it, so the stamp never outlives the flag. Setting the
/// same state twice is a no-op apart from refreshing the stamp.
pub async fn set_delivery_status(
    conn: &DatabaseConnection,
    id: Uuid,
    deliver: bool,
) -> Result<(), ApiError> {
    let delivered_at = if deliver { Some(Utc::now()) } else { None };
    let updated = repository::set_delivery_status(conn, id, deliver, delivered_at).await?;
    if !updated {
        return Err(ApiError::NotFound("Invoice not found".into()));
    }
    Ok(())
}

pub async fn delete(conn: &DatabaseConnection, id: Uuid) -> Result<(), ApiError> {
    let removed = repository::delete(conn, id).await?;
    if !removed {
        return Err(ApiError::NotFound("Invoice not found".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_for_tests;
    use chrono::TimeZone;
    use contracts::domain::invoices::aggregate::InvoiceRow;

    fn dto(card: &str, phone: &str) -> CreateInvoiceDto {
        CreateInvoiceDto {
            customer_name: "Farida".into(),
            phone_number: phone.into(),
            card_number: card.into(),
            selected_date: Some(Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap()),
            rows: vec![InvoiceRow {
                description: "dress".into(),
                qty: 2.0,
                price: 750.0,
                total: 1500.0,
            }],
            advance: 500.0,
            today: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
        }
    }

    #[tokio::test]
    async fn create_and_lookup_by_card_number() {
        let conn = connect_for_tests().await;
        create(&conn, dto("C-1", "0771112233")).await.unwrap();

        let found = get_by_card_number(&conn, "C-1").await.unwrap();
        assert_eq!(found.customer_name, "Farida");
        assert_eq!(found.grand_total(), 1500.0);
        assert!(!found.is_delivered);
        assert!(found.delivered_at.is_none());
    }

    #[tokio::test]
    async fn duplicate_card_number_conflicts_and_leaves_store_unchanged() {
        let conn = connect_for_tests().await;
        create(&conn, dto("C-7", "0770000001")).await.unwrap();

        let mut second = dto("C-7", "0779999999");
        second.customer_name = "Someone Else".into();
        let err = create(&conn, second).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        let all = list_all(&conn).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].customer_name, "Farida");
    }

    #[tokio::test]
    async fn missing_card_number_is_a_validation_error() {
        let conn = connect_for_tests().await;
        let err = create(&conn, dto("", "077")).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn mismatched_row_total_is_rejected() {
        let conn = connect_for_tests().await;
        let mut bad = dto("C-9", "077");
        bad.rows[0].total = 1400.0; // qty * price is 1500
        let err = create(&conn, bad).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn delivery_toggle_round_trips_and_clears_stamp() {
        let conn = connect_for_tests().await;
        let id = create(&conn, dto("C-2", "0772223344")).await.unwrap();

        set_delivery_status(&conn, id, true).await.unwrap();
        let delivered = get_by_card_number(&conn, "C-2").await.unwrap();
        assert!(delivered.is_delivered);
        assert!(delivered.delivered_at.is_some());

        set_delivery_status(&conn, id, false).await.unwrap();
        let reverted = get_by_card_number(&conn, "C-2").await.unwrap();
        assert!(!reverted.is_delivered);
        assert!(reverted.delivered_at.is_none());
    }

    #[tokio::test]
    async fn delete_makes_card_lookup_not_found() {
        let conn = connect_for_tests().await;
        let id = create(&conn, dto("C-3", "0773334455")).await.unwrap();

        delete(&conn, id).await.unwrap();
        let err = get_by_card_number(&conn, "C-3").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = delete(&conn, id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn unknown_id_delivery_update_is_not_found() {
        let conn = connect_for_tests().await;
        let err = set_delivery_status(&conn, Uuid::new_v4(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn phone_search_is_distinct_and_substring_based() {
        let conn = connect_for_tests().await;
        create(&conn, dto("C-4", "0771234567")).await.unwrap();
        create(&conn, dto("C-5", "0771234567")).await.unwrap();
        create(&conn, dto("C-6", "0509876543")).await.unwrap();

        let hits = search_phone_numbers(&conn, "77123").await.unwrap();
        assert_eq!(hits, vec!["0771234567".to_string()]);

        let none = search_phone_numbers(&conn, "").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn list_all_is_newest_first() {
        let conn = connect_for_tests().await;
        create(&conn, dto("C-10", "071")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        create(&conn, dto("C-11", "072")).await.unwrap();

        let all = list_all(&conn).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].card_number, "C-11");
    }

    #[tokio::test]
    async fn delivered_listing_sorts_by_delivery_time() {
        let conn = connect_for_tests().await;
        let a = create(&conn, dto("C-20", "071")).await.unwrap();
        let b = create(&conn, dto("C-21", "072")).await.unwrap();

        set_delivery_status(&conn, a, true).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        set_delivery_status(&conn, b, true).await.unwrap();

        let delivered = list_delivered(&conn).await.unwrap();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[0].card_number, "C-21");
    }
}
