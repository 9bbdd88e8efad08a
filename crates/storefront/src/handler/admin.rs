use crate::{
    abstract_trait::admin::{DynAdminAuthService, DynAdminService},
    domain::{
        requests::admin::{AdminListQuery, AdminLoginRequest},
        response::admin::{AdminListResponse, AdminTokenResponse},
    },
    middleware::{
        jwt::{AdminIdentity, auth_middleware},
        validate::{SimpleValidatedJson, ValidatedQuery},
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Map, Value, json};
use shared::errors::{ErrorResponse, HttpError};
use std::sync::Arc;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;

fn object_body(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, HttpError> {
    match body {
        Ok(Json(Value::Object(fields))) => Ok(fields),
        Ok(_) => Err(HttpError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
        Err(rejection) => Err(HttpError::BadRequest(format!(
            "Invalid JSON: {}",
            rejection.body_text()
        ))),
    }
}

#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "Admin",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Access token issued", body = AdminTokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    Extension(service): Extension<DynAdminAuthService>,
    SimpleValidatedJson(body): SimpleValidatedJson<AdminLoginRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.login(&body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/admin/{entity}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("entity" = String, Path, description = "Entity collection, e.g. jurisdictions or orders"),
        AdminListQuery
    ),
    responses(
        (status = 200, description = "Page of rows", body = AdminListResponse),
        (status = 400, description = "Unsupported filter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Unknown entity", body = ErrorResponse)
    )
)]
pub async fn list_entities(
    Extension(service): Extension<DynAdminService>,
    Path(entity): Path<String>,
    ValidatedQuery(params): ValidatedQuery<AdminListQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.list(&entity, &params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/admin/{entity}/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("entity" = String, Path, description = "Entity collection"),
        ("id" = String, Path, description = "Row identifier")
    ),
    responses(
        (status = 200, description = "Row", body = Object),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_entity(
    Extension(service): Extension<DynAdminService>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpError> {
    let row = service.get(&entity, &id).await?;
    Ok((StatusCode::OK, Json(row)))
}

#[utoipa::path(
    post,
    path = "/api/admin/{entity}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("entity" = String, Path, description = "Catalog entity collection")),
    request_body = Object,
    responses(
        (status = 201, description = "Row created", body = Object),
        (status = 400, description = "Entity not creatable or invalid fields", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Unknown entity", body = ErrorResponse)
    )
)]
pub async fn create_entity(
    Extension(service): Extension<DynAdminService>,
    Extension(identity): Extension<AdminIdentity>,
    Path(entity): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let fields = object_body(body)?;
    let row = service.create(&entity, fields).await?;
    info!("👤 {} created a {entity} row", identity.0);
    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/{entity}/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("entity" = String, Path, description = "Entity collection"),
        ("id" = String, Path, description = "Row identifier")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Updated row", body = Object),
        (status = 400, description = "Empty or non-editable fields", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_entity(
    Extension(service): Extension<DynAdminService>,
    Extension(identity): Extension<AdminIdentity>,
    Path((entity, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let fields = object_body(body)?;
    let row = service.update(&entity, &id, fields).await?;
    info!("👤 {} updated {entity} {id}", identity.0);
    Ok((StatusCode::OK, Json(row)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/{entity}/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("entity" = String, Path, description = "Entity collection"),
        ("id" = String, Path, description = "Row identifier")
    ),
    responses(
        (status = 200, description = "Row deleted"),
        (status = 400, description = "Row is still referenced", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_entity(
    Extension(service): Extension<DynAdminService>,
    Extension(identity): Extension<AdminIdentity>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpError> {
    service.delete(&entity, &id).await?;
    info!("👤 {} deleted {entity} {id}", identity.0);
    Ok((StatusCode::OK, Json(json!({ "deleted": true, "id": id }))))
}

pub fn admin_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let public = OpenApiRouter::new().route("/api/admin/login", post(login));

    let protected = OpenApiRouter::new()
        .route(
            "/api/admin/{entity}",
            get(list_entities).post(create_entity),
        )
        .route(
            "/api/admin/{entity}/{id}",
            get(get_entity).patch(update_entity).delete(delete_entity),
        )
        .route_layer(middleware::from_fn(auth_middleware));

    public
        .merge(protected)
        .layer(Extension(app_state.di_container.admin_service.clone()))
        .layer(Extension(app_state.di_container.admin_auth_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
