use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Validation(Vec<String>),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => HttpError::Validation(errors),

            ServiceError::InvalidAmount(msg) => HttpError::BadRequest(msg),

            ServiceError::InvalidCredentials => {
                HttpError::Unauthorized("Invalid credentials".to_string())
            }

            ServiceError::SignatureInvalid(_) => {
                HttpError::BadRequest("Webhook signature verification failed".to_string())
            }

            ServiceError::MissingOrderReference => {
                HttpError::BadRequest("Missing order reference".to_string())
            }

            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => HttpError::NotFound("Not found".into()),
                RepositoryError::Conflict(msg) => HttpError::Conflict(msg),
                RepositoryError::AlreadyExists(msg) => HttpError::Conflict(msg),
                RepositoryError::ForeignKey(msg) => {
                    HttpError::Conflict(format!("Foreign key violation: {msg}"))
                }
                RepositoryError::InvalidData(msg) => HttpError::BadRequest(msg),
                other => {
                    error!("❌ Repository failure: {other:?}");
                    HttpError::Internal("Internal server error".into())
                }
            },

            ServiceError::Jwt(err) => HttpError::Unauthorized(format!("JWT error: {err}")),

            ServiceError::TokenExpired => HttpError::Unauthorized("Token expired".into()),

            ServiceError::InvalidTokenType => HttpError::Unauthorized("Invalid token type".into()),

            ServiceError::Processing(msg) => {
                error!("❌ Payment processor failure: {msg}");
                HttpError::Internal("Payment processing failed".into())
            }

            ServiceError::Bcrypt(err) => {
                error!("❌ Password hashing failure: {err:?}");
                HttpError::Internal("Internal authentication error".into())
            }

            ServiceError::Internal(msg) => {
                error!("❌ Internal failure: {msg}");
                HttpError::Internal("Internal server error".into())
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            HttpError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details("Validation failed", json!(errors)),
            ),
            HttpError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorResponse::new(msg)),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::new(msg)),
            HttpError::Conflict(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            HttpError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(msg))
            }
        };

        (status, Json(body)).into_response()
    }
}
