use crate::{abstract_trait::HashingTrait, errors::ServiceError};
use async_trait::async_trait;
use bcrypt::verify;

#[derive(Clone)]
pub struct Hashing;

impl Hashing {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Hashing {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HashingTrait for Hashing {
    async fn compare_password(
        &self,
        hashed_password: &str,
        password: &str,
    ) -> Result<(), ServiceError> {
        let is_valid = verify(password, hashed_password).map_err(ServiceError::Bcrypt)?;

        if is_valid {
            Ok(())
        } else {
            Err(ServiceError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn matching_password_is_accepted() {
        let hashing = Hashing::new();
        let hashed = bcrypt::hash("s3cret", 4).unwrap();
        assert!(hashing.compare_password(&hashed, "s3cret").await.is_ok());
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let hashing = Hashing::new();
        let hashed = bcrypt::hash("s3cret", 4).unwrap();
        assert!(matches!(
            hashing.compare_password(&hashed, "guess").await,
            Err(ServiceError::InvalidCredentials)
        ));
    }
}
