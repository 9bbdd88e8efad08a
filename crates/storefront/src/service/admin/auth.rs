use crate::{
    abstract_trait::admin::AdminAuthServiceTrait,
    domain::{requests::admin::AdminLoginRequest, response::admin::AdminTokenResponse},
};
use async_trait::async_trait;
use shared::{
    abstract_trait::{DynHashing, DynJwtService},
    errors::ServiceError,
};
use tracing::{info, warn};

const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Single configured operator account; the password is stored as a bcrypt hash.
#[derive(Clone)]
pub struct AdminAuthService {
    username: String,
    password_hash: String,
    hashing: DynHashing,
    jwt: DynJwtService,
}

impl AdminAuthService {
    pub fn new(
        username: &str,
        password_hash: &str,
        hashing: DynHashing,
        jwt: DynJwtService,
    ) -> Self {
        Self {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            hashing,
            jwt,
        }
    }
}

#[async_trait]
impl AdminAuthServiceTrait for AdminAuthService {
    async fn login(&self, req: &AdminLoginRequest) -> Result<AdminTokenResponse, ServiceError> {
        if req.username != self.username {
            warn!("⚠️ Admin login rejected for unknown user '{}'", req.username);
            return Err(ServiceError::InvalidCredentials);
        }

        if let Err(e) = self
            .hashing
            .compare_password(&self.password_hash, &req.password)
            .await
        {
            warn!("⚠️ Admin login rejected for '{}': {e}", req.username);
            return Err(match e {
                ServiceError::Bcrypt(_) => e,
                _ => ServiceError::InvalidCredentials,
            });
        }

        let token = self.jwt.generate_token(&self.username, "access")?;

        info!("🔑 Admin '{}' logged in", self.username);

        Ok(AdminTokenResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: ACCESS_TOKEN_TTL_SECS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{
        abstract_trait::JwtServiceTrait,
        config::{Hashing, JwtConfig},
    };
    use std::sync::Arc;

    fn service() -> AdminAuthService {
        let hash = bcrypt::hash("correct horse", 4).unwrap();
        AdminAuthService::new(
            "admin",
            &hash,
            Arc::new(Hashing::new()),
            Arc::new(JwtConfig::new("test-secret")),
        )
    }

    fn login(username: &str, password: &str) -> AdminLoginRequest {
        AdminLoginRequest {
            username: username.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn issues_a_verifiable_token() {
        let response = service()
            .login(&login("admin", "correct horse"))
            .await
            .unwrap();

        let jwt = JwtConfig::new("test-secret");
        assert_eq!(jwt.verify_token(&response.token, "access").unwrap(), "admin");
        assert_eq!(response.expires_in, 3600);
    }

    #[tokio::test]
    async fn wrong_password_or_user_is_rejected() {
        assert!(matches!(
            service().login(&login("admin", "battery staple")).await,
            Err(ServiceError::InvalidCredentials)
        ));
        assert!(matches!(
            service().login(&login("root", "correct horse")).await,
            Err(ServiceError::InvalidCredentials)
        ));
    }
}
