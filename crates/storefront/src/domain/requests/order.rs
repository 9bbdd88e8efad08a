use crate::domain::{
    line_item::{ApplicationLineItem, ServiceLineItem},
    status::{ItemType, PaymentStatus},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

fn default_page() -> i32 {
    1
}

fn default_page_size() -> i32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, IntoParams)]
pub struct FindAllOrders {
    #[serde(default)]
    pub search: String,

    #[param(value_type = Option<String>)]
    pub status: Option<PaymentStatus>,

    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: i32,

    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_page_size", rename = "page_size")]
    pub page_size: i32,
}

impl Default for FindAllOrders {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// Checkout submits the cart before the payment intent is confirmed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 64))]
    #[serde(alias = "orderId")]
    pub order_id: String,

    #[schema(value_type = f64, example = 599)]
    #[serde(alias = "totalAmount")]
    pub total_amount: Decimal,

    #[validate(length(equal = 3, message = "Currency must be a 3-letter ISO code"))]
    pub currency: Option<String>,

    #[validate(length(min = 1, max = 255))]
    #[serde(alias = "customerName")]
    pub customer_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    #[serde(alias = "customerEmail")]
    pub customer_email: Option<String>,

    #[validate(length(max = 64))]
    #[serde(alias = "customerPhone")]
    pub customer_phone: Option<String>,

    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub applications: Vec<ApplicationLineItem>,

    #[serde(default, alias = "standaloneServices")]
    #[schema(value_type = Vec<Object>)]
    pub standalone_services: Vec<ServiceLineItem>,
}

#[derive(Debug, Clone)]
pub struct CreatePendingOrderRecord {
    pub order_id: String,
    pub total_amount: Decimal,
    pub currency: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub applications_count: i32,
    pub services_count: i32,
    pub line_items: Value,
}

/// Written by the reconciler for every payment event that names an order.
#[derive(Debug, Clone)]
pub struct UpsertOrderPaymentRecord {
    pub order_id: String,
    pub total_amount: Decimal,
    pub currency: String,
    pub payment_status: PaymentStatus,
    pub payment_intent_id: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub applications_count: i32,
    pub services_count: i32,
    pub line_items: Value,
    pub payment_metadata: Value,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CreateOrderItemRecord {
    pub order_id: String,
    pub item_type: ItemType,
    pub line_index: i32,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub total_price: Decimal,
    pub currency: String,
    pub metadata: Value,
}
