use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

pub const PAYMENT_SUCCEEDED: &str = "payment_intent.succeeded";
pub const PAYMENT_FAILED: &str = "payment_intent.payment_failed";

#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub created: i64,
    pub data: StripeEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeEventData {
    pub object: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LastPaymentError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The subset of a Stripe PaymentIntent the reconciler needs.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntentObject {
    pub id: String,
    /// Minor units.
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub receipt_email: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub last_payment_error: Option<LastPaymentError>,
}

impl PaymentIntentObject {
    pub fn amount_decimal(&self) -> Decimal {
        Decimal::new(self.amount, 2)
    }

    pub fn metadata_value(&self, key: &str) -> Option<String> {
        self.metadata
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone)]
pub enum WebhookEvent {
    Payment {
        event_id: String,
        outcome: PaymentOutcome,
        intent: PaymentIntentObject,
    },
    Ignored {
        event_id: String,
        event_type: String,
    },
}

impl WebhookEvent {
    pub fn parse(payload: &[u8]) -> Result<Self, serde_json::Error> {
        let event: StripeEvent = serde_json::from_slice(payload)?;

        let outcome = match event.event_type.as_str() {
            PAYMENT_SUCCEEDED => PaymentOutcome::Succeeded,
            PAYMENT_FAILED => PaymentOutcome::Failed,
            _ => {
                return Ok(WebhookEvent::Ignored {
                    event_id: event.id,
                    event_type: event.event_type,
                });
            }
        };

        let intent: PaymentIntentObject = serde_json::from_value(event.data.object)?;

        Ok(WebhookEvent::Payment {
            event_id: event.id,
            outcome,
            intent,
        })
    }
}

/// What the receiver did with a verified event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Reconciled { order_id: String, items_inserted: u64 },
    Dropped { event_id: String, reason: String },
    Ignored { event_id: String, event_type: String },
}
