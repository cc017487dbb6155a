use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Allowed drift between a client-sent row total and qty × price before the
/// row is rejected. Covers float rounding on the client side, nothing more.
pub const ROW_TOTAL_TOLERANCE: f64 = 0.005;

// ============================================================================
// ID Type
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceId(pub Uuid);

impl InvoiceId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }

    pub fn as_string(&self) -> String {
        self.0.to_string()
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(InvoiceId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Line item
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRow {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub qty: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub total: f64,
}

impl InvoiceRow {
    /// The authoritative total for this row. The persisted `total` field is
    /// only accepted when it agrees with this product.
    pub fn computed_total(&self) -> f64 {
        self.qty * self.price
    }
}

// ============================================================================
// Aggregate
// ============================================================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub card_number: String,
    pub customer_name: String,
    pub phone_number: String,
    /// Delivery/due date agreed with the customer.
    pub selected_date: DateTime<Utc>,
    /// The date the order was received.
    pub today: DateTime<Utc>,
    pub advance: f64,
    pub rows: Vec<InvoiceRow>,
    #[serde(default)]
    pub is_delivered: bool,
    /// Set exactly while `is_delivered` is true; cleared when delivery is
    /// reverted.
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Grand total, always recomputed from the current rows.
    pub fn grand_total(&self) -> f64 {
        self.rows.iter().map(|r| r.total).sum()
    }

    /// Balance still owed after the advance payment.
    pub fn remaining_amount(&self) -> f64 {
        self.grand_total() - self.advance
    }
}

// ============================================================================
// DTO
// ============================================================================
/// Creation payload; field names mirror the JSON the clients send.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceDto {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub card_number: String,
    pub selected_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rows: Vec<InvoiceRow>,
    #[serde(default)]
    pub advance: f64,
    pub today: Option<DateTime<Utc>>,
}

impl CreateInvoiceDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.card_number.trim().is_empty() {
            return Err("Card number is required".into());
        }
        if self.selected_date.is_none() {
            return Err("Delivery date is required".into());
        }
        if self.advance < 0.0 {
            return Err("Advance cannot be negative".into());
        }
        for (idx, row) in self.rows.iter().enumerate() {
            if row.qty < 0.0 || row.price < 0.0 {
                return Err(format!("Row {}: qty and price cannot be negative", idx + 1));
            }
            if (row.total - row.computed_total()).abs() > ROW_TOTAL_TOLERANCE {
                return Err(format!(
                    "Row {}: total {} does not match qty × price",
                    idx + 1,
                    row.total
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(qty: f64, price: f64, total: f64) -> InvoiceRow {
        InvoiceRow {
            description: "stitching".into(),
            qty,
            price,
            total,
        }
    }

    fn dto() -> CreateInvoiceDto {
        CreateInvoiceDto {
            customer_name: "Amina".into(),
            phone_number: "0771234567".into(),
            card_number: "C-100".into(),
            selected_date: Some(Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap()),
            rows: vec![row(2.0, 500.0, 1000.0)],
            advance: 300.0,
            today: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
        }
    }

    #[test]
    fn valid_dto_passes() {
        assert!(dto().validate().is_ok());
    }

    #[test]
    fn missing_card_number_rejected() {
        let mut d = dto();
        d.card_number = "  ".into();
        assert!(d.validate().is_err());
    }

    #[test]
    fn missing_delivery_date_rejected() {
        let mut d = dto();
        d.selected_date = None;
        assert!(d.validate().is_err());
    }

    #[test]
    fn mismatched_row_total_rejected() {
        let mut d = dto();
        d.rows = vec![row(2.0, 500.0, 900.0)];
        let err = d.validate().unwrap_err();
        assert!(err.contains("does not match"));
    }

    #[test]
    fn row_total_tolerates_float_noise() {
        let mut d = dto();
        d.rows = vec![row(3.0, 0.1, 0.30000000000000004)];
        assert!(d.validate().is_ok());
    }

    #[test]
    fn negative_values_rejected() {
        let mut d = dto();
        d.advance = -1.0;
        assert!(d.validate().is_err());

        let mut d = dto();
        d.rows = vec![row(-1.0, 500.0, -500.0)];
        assert!(d.validate().is_err());
    }

    #[test]
    fn grand_total_is_sum_of_row_totals() {
        let inv = Invoice {
            id: InvoiceId::new_v4(),
            card_number: "C-1".into(),
            customer_name: "Sara".into(),
            phone_number: "0700000000".into(),
            selected_date: Utc::now(),
            today: Utc::now(),
            advance: 250.0,
            rows: vec![row(1.0, 800.0, 800.0), row(2.0, 150.0, 300.0)],
            is_delivered: false,
            delivered_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(inv.grand_total(), 1100.0);
        assert_eq!(inv.remaining_amount(), 850.0);
    }

    #[test]
    fn wire_shape_uses_camel_case() {
        let json = serde_json::to_value(dto()).unwrap();
        assert!(json.get("cardNumber").is_some());
        assert!(json.get("selectedDate").is_some());
        assert!(json.get("customerName").is_some());
    }
}
