use crate::domain::{
    requests::payment_intent::CreatePaymentIntentRequest,
    response::payment_intent::PaymentIntentResponse,
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynPaymentIntentService = Arc<dyn PaymentIntentServiceTrait + Send + Sync>;

#[async_trait]
pub trait PaymentIntentServiceTrait {
    async fn create_payment_intent(
        &self,
        req: &CreatePaymentIntentRequest,
    ) -> Result<PaymentIntentResponse, ServiceError>;
}
