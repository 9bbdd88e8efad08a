use crate::{
    abstract_trait::payment::DynPaymentIntentService,
    domain::{
        requests::payment_intent::CreatePaymentIntentRequest,
        response::payment_intent::PaymentIntentResponse,
    },
    middleware::validate::SimpleValidatedJson,
    state::AppState,
};
use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use shared::errors::{ErrorResponse, HttpError};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/create-payment-intent",
    tag = "Payment",
    request_body = CreatePaymentIntentRequest,
    responses(
        (status = 200, description = "Payment intent created", body = PaymentIntentResponse),
        (status = 400, description = "Invalid amount or body", body = ErrorResponse),
        (status = 500, description = "Payment processing failed", body = ErrorResponse)
    )
)]
pub async fn create_payment_intent(
    Extension(service): Extension<DynPaymentIntentService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreatePaymentIntentRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_payment_intent(&body).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn payment_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/create-payment-intent", post(create_payment_intent))
        .layer(Extension(
            app_state.di_container.payment_intent_service.clone(),
        ))
}
