use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub order_item_id: i64,
    pub order_id: String,
    pub item_type: String,
    pub line_index: i32,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub total_price: Decimal,
    pub currency: String,
    pub metadata: Value,
    pub created_at: Option<DateTime<Utc>>,
}
