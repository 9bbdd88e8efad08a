use crate::{
    abstract_trait::order::service::{DynOrderCommandService, DynOrderQueryService},
    domain::{
        requests::order::{CreateOrderRequest, FindAllOrders},
        response::{
            api::{ApiResponse, ApiResponsePagination},
            order::{OrderResponse, OrderWithItemsResponse},
        },
    },
    middleware::{
        jwt::auth_middleware,
        validate::{SimpleValidatedJson, ValidatedQuery},
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::errors::{ErrorResponse, HttpError};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Order",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Pending order recorded", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Validation error or duplicate order id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_order(
    Extension(service): Extension<DynOrderCommandService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_order(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{order_id}",
    tag = "Order",
    params(("order_id" = String, Path, description = "Order reference")),
    responses(
        (status = 200, description = "Order with its items", body = ApiResponse<OrderWithItemsResponse>),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
pub async fn get_order(
    Extension(service): Extension<DynOrderQueryService>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(&order_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(FindAllOrders),
    responses(
        (status = 200, description = "List of orders", body = ApiResponsePagination<Vec<OrderResponse>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_orders(
    Extension(service): Extension<DynOrderQueryService>,
    ValidatedQuery(params): ValidatedQuery<FindAllOrders>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn order_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let public = OpenApiRouter::new()
        .route("/api/orders", post(create_order))
        .route("/api/orders/{order_id}", get(get_order));

    let admin = OpenApiRouter::new()
        .route("/api/orders", get(get_orders))
        .route_layer(middleware::from_fn(auth_middleware));

    public
        .merge(admin)
        .layer(Extension(app_state.di_container.order_command_service.clone()))
        .layer(Extension(app_state.di_container.order_query_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
