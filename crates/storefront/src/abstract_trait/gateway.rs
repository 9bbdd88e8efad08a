use crate::domain::{
    requests::payment_intent::CreatePaymentIntentParams,
    response::payment_intent::PaymentIntentResponse,
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynPaymentGateway = Arc<dyn PaymentGatewayTrait + Send + Sync>;

/// The external payment processor.
#[async_trait]
pub trait PaymentGatewayTrait {
    async fn create_payment_intent(
        &self,
        params: &CreatePaymentIntentParams,
    ) -> Result<PaymentIntentResponse, ServiceError>;
}
