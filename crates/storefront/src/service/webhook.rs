use crate::{
    abstract_trait::webhook::{DynOrderReconciler, WebhookServiceTrait},
    domain::event::{WebhookEvent, WebhookOutcome},
    gateway::StripeSignatureVerifier,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, ServiceTracer},
};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct WebhookService {
    verifier: StripeSignatureVerifier,
    reconciler: DynOrderReconciler,
    tracer: ServiceTracer,
}

impl WebhookService {
    pub fn new(
        verifier: StripeSignatureVerifier,
        reconciler: DynOrderReconciler,
        registry: &mut Registry,
    ) -> Self {
        Self {
            verifier,
            reconciler,
            tracer: ServiceTracer::new("webhook-service", registry),
        }
    }
}

#[async_trait]
impl WebhookServiceTrait for WebhookService {
    async fn handle(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookOutcome, ServiceError> {
        let method = Method::Post;
        let tracing_ctx = self.tracer.start_tracing(
            "HandleWebhook",
            vec![
                KeyValue::new("component", "webhook"),
                KeyValue::new("payload.bytes", payload.len() as i64),
            ],
        );

        if let Err(e) = self.verifier.verify(payload, signature) {
            warn!("⚠️ Rejected webhook delivery: {e}");
            self.tracer
                .complete_tracing_error(&tracing_ctx, method, &e.to_string());
            return Err(e);
        }

        let event = match WebhookEvent::parse(payload) {
            Ok(event) => event,
            Err(e) => {
                error!(
                    review = true,
                    "🚨 Verified webhook payload could not be parsed: {e}"
                );
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Unparseable webhook payload");
                return Ok(WebhookOutcome::Dropped {
                    event_id: String::new(),
                    reason: format!("unparseable payload: {e}"),
                });
            }
        };

        let outcome = match event {
            WebhookEvent::Ignored {
                event_id,
                event_type,
            } => {
                info!("ℹ️ Acknowledged unhandled event {event_id} ({event_type})");
                WebhookOutcome::Ignored {
                    event_id,
                    event_type,
                }
            }
            WebhookEvent::Payment {
                event_id,
                outcome,
                intent,
            } => match self.reconciler.reconcile(&event_id, outcome, &intent).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("❌ Reconciliation of event {event_id} failed after acknowledgement: {e}");
                    WebhookOutcome::Dropped {
                        event_id,
                        reason: e.to_string(),
                    }
                }
            },
        };

        match &outcome {
            WebhookOutcome::Dropped { reason, .. } => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, reason)
            }
            other => self.tracer.complete_tracing_success(
                &tracing_ctx,
                method,
                &format!("Webhook handled: {other:?}"),
            ),
        }

        Ok(outcome)
    }
}
