use crate::{
    abstract_trait::{gateway::DynPaymentGateway, payment::PaymentIntentServiceTrait},
    domain::{
        requests::payment_intent::{CreatePaymentIntentParams, CreatePaymentIntentRequest},
        response::payment_intent::PaymentIntentResponse,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde_json::Value;
use shared::{
    errors::ServiceError,
    utils::{Method, ServiceTracer},
};
use std::collections::{BTreeMap, HashMap};
use tracing::{error, info};

/// `round(amount * 100)`, halves away from zero.
pub fn to_minor_units(amount: Decimal) -> Result<i64, ServiceError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|minor| minor.to_i64())
        .ok_or_else(|| ServiceError::InvalidAmount(format!("Amount {amount} is too large")))
}

fn stringify_metadata(metadata: &HashMap<String, Value>) -> BTreeMap<String, String> {
    metadata
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect()
}

#[derive(Clone)]
pub struct PaymentIntentService {
    gateway: DynPaymentGateway,
    default_currency: String,
    tracer: ServiceTracer,
}

impl PaymentIntentService {
    pub fn new(gateway: DynPaymentGateway, default_currency: &str, registry: &mut Registry) -> Self {
        Self {
            gateway,
            default_currency: default_currency.to_lowercase(),
            tracer: ServiceTracer::new("payment-intent-service", registry),
        }
    }
}

#[async_trait]
impl PaymentIntentServiceTrait for PaymentIntentService {
    async fn create_payment_intent(
        &self,
        req: &CreatePaymentIntentRequest,
    ) -> Result<PaymentIntentResponse, ServiceError> {
        let currency = req
            .currency
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_else(|| self.default_currency.clone());

        info!(
            "💳 Creating payment intent | Amount: {} {}",
            req.amount, currency
        );

        let method = Method::Post;
        let tracing_ctx = self.tracer.start_tracing(
            "CreatePaymentIntent",
            vec![
                KeyValue::new("component", "payment_intent"),
                KeyValue::new("payment.amount", req.amount.to_string()),
                KeyValue::new("payment.currency", currency.clone()),
            ],
        );

        if req.amount <= Decimal::ZERO {
            let msg = format!("Amount must be greater than zero, got {}", req.amount);
            self.tracer
                .complete_tracing_error(&tracing_ctx, method, &msg);
            return Err(ServiceError::InvalidAmount(msg));
        }

        let amount_minor = match to_minor_units(req.amount) {
            Ok(minor) => minor,
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, &e.to_string());
                return Err(e);
            }
        };

        let mut metadata = stringify_metadata(&req.metadata);
        metadata.insert("created_at".to_string(), Utc::now().to_rfc3339());

        let params = CreatePaymentIntentParams {
            amount_minor,
            currency,
            metadata,
            receipt_email: req.customer_email.clone(),
            description: req.description.clone(),
        };

        match self.gateway.create_payment_intent(&params).await {
            Ok(intent) => {
                self.tracer.complete_tracing_success(
                    &tracing_ctx,
                    method,
                    &format!("Payment intent {} created", intent.payment_intent_id),
                );
                Ok(intent)
            }
            Err(e) => {
                error!("❌ Payment intent creation failed: {e}");
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, &e.to_string());
                Err(e)
            }
        }
    }
}
