use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use shared::errors::ErrorResponse;
use validator::{Validate, ValidationErrors};

/// JSON body extractor that runs `validator` rules before the handler sees
/// the value. Rejections use the uniform `{error, details}` body.
pub struct SimpleValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = (StatusCode, axum::Json<ErrorResponse>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let status = match rejection.status() {
                    StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
                    other => other,
                };
                (
                    status,
                    axum::Json(ErrorResponse::with_details(
                        "Invalid JSON",
                        json!(rejection.body_text()),
                    )),
                )
            })?;

        value.validate().map_err(|validation_errors| {
            (
                StatusCode::BAD_REQUEST,
                axum::Json(ErrorResponse::with_details(
                    "Validation failed",
                    format_validation_errors_detailed(&validation_errors),
                )),
            )
        })?;

        Ok(Self(value))
    }
}

/// Query-string counterpart of [`SimpleValidatedJson`].
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = (StatusCode, axum::Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                (
                    StatusCode::BAD_REQUEST,
                    axum::Json(ErrorResponse::with_details(
                        "Invalid query parameters",
                        json!(rejection.body_text()),
                    )),
                )
            })?;

        value.validate().map_err(|validation_errors| {
            (
                StatusCode::BAD_REQUEST,
                axum::Json(ErrorResponse::with_details(
                    "Validation failed",
                    format_validation_errors_detailed(&validation_errors),
                )),
            )
        })?;

        Ok(Self(value))
    }
}

fn format_validation_errors_detailed(errors: &ValidationErrors) -> Value {
    let mut error_map = Map::new();

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| match e.code.as_ref() {
                        "email" => "Invalid email format".to_string(),
                        "length" => "Invalid length".to_string(),
                        "range" => "Value out of range".to_string(),
                        _ => format!("Invalid {field}"),
                    })
            })
            .collect();
        error_map.insert(field.to_string(), json!(messages));
    }

    Value::Object(error_map)
}
