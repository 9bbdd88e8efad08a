use crate::domain::event::{PaymentIntentObject, PaymentOutcome, WebhookOutcome};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynWebhookService = Arc<dyn WebhookServiceTrait + Send + Sync>;
pub type DynOrderReconciler = Arc<dyn OrderReconcilerTrait + Send + Sync>;

#[async_trait]
pub trait WebhookServiceTrait {
    /// `Err` only when the signature does not verify; anything after that
    /// is acknowledged.
    async fn handle(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookOutcome, ServiceError>;
}

#[async_trait]
pub trait OrderReconcilerTrait {
    async fn reconcile(
        &self,
        event_id: &str,
        outcome: PaymentOutcome,
        intent: &PaymentIntentObject,
    ) -> Result<WebhookOutcome, ServiceError>;
}
