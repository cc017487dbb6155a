use chrono::{DateTime, Utc};
use contracts::domain::invoices::aggregate::{Invoice, InvoiceId, InvoiceRow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub card_number: String,
    pub customer_name: String,
    pub phone_number: String,
    pub selected_date: DateTime<Utc>,
    pub today: DateTime<Utc>,
    pub advance: f64,
    /// Line items, persisted verbatim as a JSON array.
    pub rows: Json,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Invoice {
    fn from(m: Model) -> Self {
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let rows: Vec<InvoiceRow> = serde_json::from_value(m.rows).unwrap_or_default();

        Invoice {
            id: InvoiceId::new(uuid),
            card_number: m.card_number,
            customer_name: m.customer_name,
            phone_number: m.phone_number,
            selected_date: m.selected_date,
            today: m.today,
            advance: m.advance,
            rows,
            is_delivered: m.is_delivered,
            delivered_at: m.delivered_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn to_active_model(aggregate: &Invoice) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.id.as_string()),
        card_number: Set(aggregate.card_number.clone()),
        customer_name: Set(aggregate.customer_name.clone()),
        phone_number: Set(aggregate.phone_number.clone()),
        selected_date: Set(aggregate.selected_date),
        today: Set(aggregate.today),
        advance: Set(aggregate.advance),
        rows: Set(serde_json::to_value(&aggregate.rows).unwrap_or_else(|_| Json::Array(vec![]))),
        is_delivered: Set(aggregate.is_delivered),
        delivered_at: Set(aggregate.delivered_at),
        created_at: Set(aggregate.created_at),
        updated_at: Set(aggregate.updated_at),
    }
}

/// All invoices, newest first. The original client reversed insertion order
/// after fetching; here the store returns that order directly.
pub async fn list_all(conn: &DatabaseConnection) -> anyhow::Result<Vec<Invoice>> {
    let items = Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(conn)
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

/// Delivered invoices only, most recent delivery first.
pub async fn list_delivered(conn: &DatabaseConnection) -> anyhow::Result<Vec<Invoice>> {
    let items = Entity::find()
        .filter(Column::IsDelivered.eq(true))
        .filter(Column::DeliveredAt.is_not_null())
        .order_by_desc(Column::DeliveredAt)
        .all(conn)
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn get_by_id(conn: &DatabaseConnection, id: Uuid) -> anyhow::Result<Option<Invoice>> {
    let result = Entity::find_by_id(id.to_string()).one(conn).await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_card_number(
    conn: &DatabaseConnection,
    card_number: &str,
) -> anyhow::Result<Option<Invoice>> {
    let result = Entity::find()
        .filter(Column::CardNumber.eq(card_number))
        .one(conn)
        .await?;
    Ok(result.map(Into::into))
}

/// Distinct phone numbers containing `fragment`, for autocomplete. SQLite's
/// LIKE is case-insensitive for ASCII, which matches the original behavior.
pub async fn search_phone_numbers(
    conn: &DatabaseConnection,
    fragment: &str,
) -> anyhow::Result<Vec<String>> {
    let numbers: Vec<String> = Entity::find()
        .select_only()
        .column(Column::PhoneNumber)
        .distinct()
        .filter(Column::PhoneNumber.contains(fragment))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(numbers)
}

/// Insert a new invoice. The UNIQUE index on card_number makes this an atomic
/// insert-if-absent; callers inspect the `DbErr` for a unique-constraint
/// violation to report a duplicate card number.
pub async fn insert(conn: &DatabaseConnection, aggregate: &Invoice) -> Result<Uuid, DbErr> {
    let active = to_active_model(aggregate);
    active.insert(conn).await?;
    Ok(aggregate.id.value())
}

/// Set the delivery flag and stamp. Returns false when the id is unknown.
pub async fn set_delivery_status(
    conn: &DatabaseConnection,
    id: Uuid,
    is_delivered: bool,
    delivered_at: Option<DateTime<Utc>>,
) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::IsDelivered, Expr::value(is_delivered))
        .col_expr(Column::DeliveredAt, Expr::value(delivered_at))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Hard delete; the invoice lifecycle has no soft-delete or audit trail.
pub async fn delete(conn: &DatabaseConnection, id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
