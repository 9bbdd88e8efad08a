use crate::{
    abstract_trait::webhook::DynWebhookService,
    domain::response::payment_intent::WebhookAckResponse, state::AppState,
};
use axum::{
    Json,
    body::Bytes,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use shared::errors::{ErrorResponse, HttpError};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

#[utoipa::path(
    post,
    path = "/api/webhooks/stripe",
    tag = "Webhook",
    request_body(content = String, description = "Raw Stripe event JSON", content_type = "application/json"),
    params(("stripe-signature" = String, Header, description = "t=<unix>,v1=<hex>")),
    responses(
        (status = 200, description = "Event accepted", body = WebhookAckResponse),
        (status = 400, description = "Signature verification failed", body = ErrorResponse)
    )
)]
pub async fn stripe_webhook(
    Extension(service): Extension<DynWebhookService>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    service.handle(&body, signature).await?;

    Ok((StatusCode::OK, Json(WebhookAckResponse { received: true })))
}

pub fn webhook_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/webhooks/stripe", post(stripe_webhook))
        .layer(Extension(app_state.di_container.webhook_service.clone()))
}
