use crate::errors::repository::RepositoryError;
use bcrypt::BcryptError;
use jsonwebtoken::errors::Error as JwtError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Webhook signature invalid: {0}")]
    SignatureInvalid(String),

    #[error("Missing order reference in payment metadata")]
    MissingOrderReference,

    #[error("Payment processing error: {0}")]
    Processing(String),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] BcryptError),

    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid Token")]
    InvalidTokenType,

    #[error("Internal error: {0}")]
    Internal(String),
}
