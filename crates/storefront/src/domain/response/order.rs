use crate::model::{order::Order as OrderModel, order_item::OrderItem as OrderItemModel};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderResponse {
    pub order_id: String,
    #[schema(value_type = f64)]
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_amount: Decimal,
    pub currency: String,
    pub payment_status: String,
    pub payment_intent_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub applications_count: i32,
    pub services_count: i32,
    #[schema(value_type = Object)]
    pub line_items: Value,
    #[schema(value_type = Object)]
    pub payment_metadata: Value,
    pub admin_notes: Option<String>,
    pub paid_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<OrderModel> for OrderResponse {
    fn from(value: OrderModel) -> Self {
        OrderResponse {
            order_id: value.order_id,
            total_amount: value.total_amount,
            currency: value.currency,
            payment_status: value.payment_status,
            payment_intent_id: value.payment_intent_id,
            customer_name: value.customer_name,
            customer_email: value.customer_email,
            customer_phone: value.customer_phone,
            applications_count: value.applications_count,
            services_count: value.services_count,
            line_items: value.line_items,
            payment_metadata: value.payment_metadata,
            admin_notes: value.admin_notes,
            paid_at: value.paid_at.map(|dt| dt.to_rfc3339()),
            created_at: value.created_at.map(|dt| dt.to_rfc3339()),
            updated_at: value.updated_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderItemResponse {
    pub id: i64,
    pub order_id: String,
    pub item_type: String,
    pub line_index: i32,
    pub name: String,
    #[schema(value_type = f64)]
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub unit_price: Decimal,
    pub quantity: i32,
    #[schema(value_type = f64)]
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_price: Decimal,
    pub currency: String,
    #[schema(value_type = Object)]
    pub metadata: Value,
    pub created_at: Option<String>,
}

impl From<OrderItemModel> for OrderItemResponse {
    fn from(value: OrderItemModel) -> Self {
        OrderItemResponse {
            id: value.order_item_id,
            order_id: value.order_id,
            item_type: value.item_type,
            line_index: value.line_index,
            name: value.name,
            unit_price: value.unit_price,
            quantity: value.quantity,
            total_price: value.total_price,
            currency: value.currency,
            metadata: value.metadata,
            created_at: value.created_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Confirmation page payload.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderWithItemsResponse {
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
}
