use crate::domain::{admin_entity::AdminEntity, requests::admin::AdminListQuery};
use async_trait::async_trait;
use serde_json::{Map, Value};
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynAdminRepository = Arc<dyn AdminRepositoryTrait + Send + Sync>;

/// Rows travel as JSON objects so one implementation serves every entity.
/// Column lists passed in have already been checked against the entity.
#[async_trait]
pub trait AdminRepositoryTrait {
    async fn list(
        &self,
        entity: &'static AdminEntity,
        query: &AdminListQuery,
    ) -> Result<(Vec<Value>, i64), RepositoryError>;
    async fn find_by_id(
        &self,
        entity: &'static AdminEntity,
        id: &str,
    ) -> Result<Option<Value>, RepositoryError>;
    async fn update(
        &self,
        entity: &'static AdminEntity,
        id: &str,
        columns: &[&'static str],
        fields: &Map<String, Value>,
    ) -> Result<Option<Value>, RepositoryError>;
    async fn create(
        &self,
        entity: &'static AdminEntity,
        columns: &[&'static str],
        fields: &Map<String, Value>,
    ) -> Result<Value, RepositoryError>;
    /// `NotFound` when nothing matched, `Conflict` while references exist.
    async fn delete(&self, entity: &'static AdminEntity, id: &str) -> Result<(), RepositoryError>;
}
