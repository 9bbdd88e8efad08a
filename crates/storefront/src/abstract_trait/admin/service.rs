use crate::domain::{
    requests::admin::{AdminListQuery, AdminLoginRequest},
    response::admin::{AdminListResponse, AdminTokenResponse},
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynAdminService = Arc<dyn AdminServiceTrait + Send + Sync>;
pub type DynAdminAuthService = Arc<dyn AdminAuthServiceTrait + Send + Sync>;

#[async_trait]
pub trait AdminServiceTrait {
    async fn list(
        &self,
        entity: &str,
        query: &AdminListQuery,
    ) -> Result<AdminListResponse, ServiceError>;
    async fn get(&self, entity: &str, id: &str) -> Result<Value, ServiceError>;
    async fn update(
        &self,
        entity: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Value, ServiceError>;
    async fn create(&self, entity: &str, fields: Map<String, Value>)
    -> Result<Value, ServiceError>;
    async fn delete(&self, entity: &str, id: &str) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait AdminAuthServiceTrait {
    async fn login(&self, req: &AdminLoginRequest) -> Result<AdminTokenResponse, ServiceError>;
}
