use crate::{
    abstract_trait::gateway::PaymentGatewayTrait,
    config::StripeConfig,
    domain::{
        requests::payment_intent::CreatePaymentIntentParams,
        response::payment_intent::PaymentIntentResponse,
    },
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::errors::ServiceError;
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
struct StripePaymentIntent {
    id: String,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
}

/// Form-encoded client for the Stripe PaymentIntents API.
#[derive(Clone)]
pub struct StripeGateway {
    client: Client,
    api_base: String,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(config: &StripeConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ServiceError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        })
    }
}

pub(crate) fn form_params(params: &CreatePaymentIntentParams) -> Vec<(String, String)> {
    let mut form = vec![
        ("amount".to_string(), params.amount_minor.to_string()),
        ("currency".to_string(), params.currency.clone()),
        (
            "automatic_payment_methods[enabled]".to_string(),
            "true".to_string(),
        ),
    ];

    for (key, value) in &params.metadata {
        form.push((format!("metadata[{key}]"), value.clone()));
    }

    if let Some(email) = &params.receipt_email {
        form.push(("receipt_email".to_string(), email.clone()));
    }

    if let Some(description) = &params.description {
        form.push(("description".to_string(), description.clone()));
    }

    form
}

#[async_trait]
impl PaymentGatewayTrait for StripeGateway {
    async fn create_payment_intent(
        &self,
        params: &CreatePaymentIntentParams,
    ) -> Result<PaymentIntentResponse, ServiceError> {
        let url = format!("{}/v1/payment_intents", self.api_base);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&form_params(params))
            .send()
            .await
            .map_err(|e| {
                error!("❌ Stripe request failed: {e}");
                ServiceError::Processing(format!("request to processor failed: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let detail = response
                .json::<StripeErrorBody>()
                .await
                .map(|body| {
                    format!(
                        "{}: {}",
                        body.error.kind.unwrap_or_else(|| "unknown".into()),
                        body.error.message.unwrap_or_default()
                    )
                })
                .unwrap_or_else(|_| "unreadable error body".to_string());

            error!("❌ Stripe rejected payment intent ({status}): {detail}");
            return Err(ServiceError::Processing(format!(
                "processor returned {status}: {detail}"
            )));
        }

        let intent: StripePaymentIntent = response.json().await.map_err(|e| {
            error!("❌ Unexpected Stripe response body: {e}");
            ServiceError::Processing(format!("unexpected processor response: {e}"))
        })?;

        let client_secret = intent.client_secret.ok_or_else(|| {
            ServiceError::Processing(format!("payment intent {} has no client secret", intent.id))
        })?;

        info!("💳 Created payment intent {}", intent.id);

        Ok(PaymentIntentResponse {
            client_secret,
            payment_intent_id: intent.id,
        })
    }
}
