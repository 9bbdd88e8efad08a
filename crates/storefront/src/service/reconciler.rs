use crate::{
    abstract_trait::{
        order::repository::DynOrderCommandRepository,
        order_item::repository::DynOrderItemCommandRepository, webhook::OrderReconcilerTrait,
    },
    domain::{
        event::{PaymentIntentObject, PaymentOutcome, WebhookOutcome},
        line_item::LineItemSnapshot,
        requests::order::{CreateOrderItemRecord, UpsertOrderPaymentRecord},
        status::PaymentStatus,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use serde_json::{Value, json};
use shared::{
    errors::ServiceError,
    utils::{Method, ServiceTracer},
};
use tracing::{error, info};

const ORDER_ID_KEY: &str = "order_id";

/// Turns a verified payment event into order and order-item rows.
#[derive(Clone)]
pub struct OrderReconciler {
    order_command: DynOrderCommandRepository,
    order_item_command: DynOrderItemCommandRepository,
    tracer: ServiceTracer,
}

impl OrderReconciler {
    pub fn new(
        order_command: DynOrderCommandRepository,
        order_item_command: DynOrderItemCommandRepository,
        registry: &mut Registry,
    ) -> Self {
        Self {
            order_command,
            order_item_command,
            tracer: ServiceTracer::new("order-reconciler", registry),
        }
    }

    fn payment_metadata(
        event_id: &str,
        outcome: PaymentOutcome,
        intent: &PaymentIntentObject,
    ) -> Value {
        let mut snapshot = json!({
            "event_id": event_id,
            "payment_intent_id": intent.id,
            "amount_minor": intent.amount,
            "metadata": intent.metadata,
        });

        if let (PaymentOutcome::Failed, Some(last_error)) = (outcome, &intent.last_payment_error) {
            snapshot["last_payment_error"] = json!({
                "code": last_error.code,
                "message": last_error.message,
            });
        }

        snapshot
    }

    fn order_items(
        order_id: &str,
        currency: &str,
        snapshot: &LineItemSnapshot,
    ) -> Vec<CreateOrderItemRecord> {
        snapshot
            .line_items()
            .into_iter()
            .map(|(line_index, line)| CreateOrderItemRecord {
                order_id: order_id.to_string(),
                item_type: line.item_type(),
                line_index,
                name: line.name(),
                unit_price: line.unit_price(),
                quantity: line.quantity(),
                total_price: line.total_price(),
                currency: currency.to_string(),
                metadata: line.metadata(),
            })
            .collect()
    }
}

#[async_trait]
impl OrderReconcilerTrait for OrderReconciler {
    async fn reconcile(
        &self,
        event_id: &str,
        outcome: PaymentOutcome,
        intent: &PaymentIntentObject,
    ) -> Result<WebhookOutcome, ServiceError> {
        let method = Method::Post;
        let tracing_ctx = self.tracer.start_tracing(
            "ReconcileOrder",
            vec![
                KeyValue::new("component", "reconciler"),
                KeyValue::new("event.id", event_id.to_string()),
                KeyValue::new("payment_intent.id", intent.id.clone()),
                KeyValue::new("payment.outcome", format!("{outcome:?}")),
            ],
        );

        let Some(order_id) = intent.metadata_value(ORDER_ID_KEY) else {
            error!(
                review = true,
                event_id = %event_id,
                payment_intent_id = %intent.id,
                amount_minor = intent.amount,
                "🚨 Payment event has no order_id in metadata; nothing was recorded"
            );
            self.tracer.complete_tracing_error(
                &tracing_ctx,
                method,
                "Missing order reference in payment metadata",
            );
            return Err(ServiceError::MissingOrderReference);
        };

        let snapshot = LineItemSnapshot::from_metadata(&intent.metadata);

        for (field, reason) in snapshot.unparsed_fields() {
            error!(
                review = true,
                order_id = %order_id,
                event_id = %event_id,
                field,
                reason,
                "🚨 Malformed line items in payment metadata; recording zero items for this field"
            );
        }

        let currency = intent.currency.to_lowercase();
        let (payment_status, paid_at) = match outcome {
            PaymentOutcome::Succeeded => (PaymentStatus::Paid, Some(Utc::now())),
            PaymentOutcome::Failed => (PaymentStatus::Failed, None),
        };

        let record = UpsertOrderPaymentRecord {
            order_id: order_id.clone(),
            total_amount: intent.amount_decimal(),
            currency: currency.clone(),
            payment_status,
            payment_intent_id: intent.id.clone(),
            customer_name: intent.metadata_value("customer_name"),
            customer_email: intent
                .metadata_value("customer_email")
                .or_else(|| intent.receipt_email.clone()),
            customer_phone: intent.metadata_value("customer_phone"),
            applications_count: snapshot.applications_count(),
            services_count: snapshot.services_count(),
            line_items: snapshot.to_json(),
            payment_metadata: Self::payment_metadata(event_id, outcome, intent),
            paid_at,
        };

        if let Err(e) = self.order_command.upsert_payment(&record).await {
            self.tracer.complete_tracing_error(
                &tracing_ctx,
                method,
                &format!("Failed to upsert order {order_id}: {e}"),
            );
            return Err(ServiceError::Repo(e));
        }

        let items_inserted = match outcome {
            PaymentOutcome::Succeeded => {
                let items = Self::order_items(&order_id, &currency, &snapshot);
                match self.order_item_command.insert_items(&items).await {
                    Ok(inserted) => inserted,
                    Err(e) => {
                        self.tracer.complete_tracing_error(
                            &tracing_ctx,
                            method,
                            &format!("Failed to insert items for order {order_id}: {e}"),
                        );
                        return Err(ServiceError::Repo(e));
                    }
                }
            }
            PaymentOutcome::Failed => 0,
        };

        info!(
            "🧾 Order {order_id} reconciled as {payment_status} ({items_inserted} new items)"
        );
        self.tracer.complete_tracing_success(
            &tracing_ctx,
            method,
            &format!("Order {order_id} marked {payment_status}"),
        );

        Ok(WebhookOutcome::Reconciled {
            order_id,
            items_inserted,
        })
    }
}
