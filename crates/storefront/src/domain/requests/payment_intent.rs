use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentIntentRequest {
    /// Major units, e.g. `599` or `599.99`.
    #[schema(value_type = f64, example = 599)]
    pub amount: Decimal,

    #[validate(length(equal = 3, message = "Currency must be a 3-letter ISO code"))]
    pub currency: Option<String>,

    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: HashMap<String, Value>,

    #[validate(email(message = "Invalid email format"))]
    #[serde(alias = "customerEmail")]
    pub customer_email: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// What is sent to the payment processor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePaymentIntentParams {
    pub amount_minor: i64,
    pub currency: String,
    pub metadata: BTreeMap<String, String>,
    pub receipt_email: Option<String>,
    pub description: Option<String>,
}
