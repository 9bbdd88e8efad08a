use crate::{
    abstract_trait::admin::{AdminServiceTrait, DynAdminRepository},
    domain::{
        admin_entity::AdminEntity, requests::admin::AdminListQuery,
        response::admin::AdminListResponse,
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use serde_json::{Map, Value};
use shared::{
    errors::{RepositoryError, ServiceError},
    utils::{Method, ServiceTracer, TracingContext},
};
use tracing::{info, warn};

fn resolve(entity: &str) -> Result<&'static AdminEntity, ServiceError> {
    AdminEntity::find(entity).ok_or_else(|| {
        warn!("⚠️ Unknown admin entity '{entity}'");
        ServiceError::Repo(RepositoryError::NotFound)
    })
}

#[derive(Clone)]
pub struct AdminService {
    repo: DynAdminRepository,
    tracer: ServiceTracer,
}

impl AdminService {
    pub fn new(repo: DynAdminRepository, registry: &mut Registry) -> Self {
        Self {
            repo,
            tracer: ServiceTracer::new("admin-service", registry),
        }
    }

    fn finish<T>(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        result: Result<T, ServiceError>,
        success: impl FnOnce(&T) -> String,
    ) -> Result<T, ServiceError> {
        match &result {
            Ok(value) => self
                .tracer
                .complete_tracing_success(tracing_ctx, method, &success(value)),
            Err(e) => self
                .tracer
                .complete_tracing_error(tracing_ctx, method, &e.to_string()),
        }
        result
    }
}

#[async_trait]
impl AdminServiceTrait for AdminService {
    async fn list(
        &self,
        entity: &str,
        query: &AdminListQuery,
    ) -> Result<AdminListResponse, ServiceError> {
        let entity = resolve(entity)?;
        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "AdminList",
            vec![
                KeyValue::new("entity", entity.name),
                KeyValue::new("page", query.page.to_string()),
            ],
        );

        let result: Result<AdminListResponse, ServiceError> = async {
            let wants_status = query
                .status
                .as_deref()
                .is_some_and(|s| !s.trim().is_empty());
            if wants_status && entity.status_column.is_none() {
                return Err(ServiceError::Validation(vec![format!(
                    "status: {} cannot be filtered by status",
                    entity.name
                )]));
            }

            let (items, total) = self.repo.list(entity, query).await?;

            Ok(AdminListResponse {
                items,
                total,
                page: query.page,
                page_size: query.page_size,
            })
        }
        .await;

        self.finish(&tracing_ctx, method, result, |res| {
            format!(
                "Listed {} {} (total: {})",
                res.items.len(),
                entity.name,
                res.total
            )
        })
    }

    async fn get(&self, entity: &str, id: &str) -> Result<Value, ServiceError> {
        let entity = resolve(entity)?;
        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "AdminGet",
            vec![
                KeyValue::new("entity", entity.name),
                KeyValue::new("id", id.to_string()),
            ],
        );

        let result = self
            .repo
            .find_by_id(entity, id)
            .await
            .map_err(ServiceError::Repo)
            .and_then(|row| row.ok_or(ServiceError::Repo(RepositoryError::NotFound)));

        self.finish(&tracing_ctx, method, result, |_| {
            format!("Fetched {} {id}", entity.name)
        })
    }

    async fn update(
        &self,
        entity: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Value, ServiceError> {
        let entity = resolve(entity)?;
        let method = Method::Patch;
        let tracing_ctx = self.tracer.start_tracing(
            "AdminUpdate",
            vec![
                KeyValue::new("entity", entity.name),
                KeyValue::new("id", id.to_string()),
            ],
        );

        let result: Result<Value, ServiceError> = async {
            let columns = entity.update_columns(&fields)?;
            self.repo
                .update(entity, id, &columns, &fields)
                .await?
                .ok_or(ServiceError::Repo(RepositoryError::NotFound))
        }
        .await;

        self.finish(&tracing_ctx, method, result, |_| {
            format!("Updated {} {id}", entity.name)
        })
    }

    async fn create(
        &self,
        entity: &str,
        fields: Map<String, Value>,
    ) -> Result<Value, ServiceError> {
        let entity = resolve(entity)?;
        let method = Method::Post;
        let tracing_ctx = self.tracer.start_tracing(
            "AdminCreate",
            vec![KeyValue::new("entity", entity.name)],
        );

        let result: Result<Value, ServiceError> = async {
            let columns = entity.create_columns(&fields)?;
            Ok(self.repo.create(entity, &columns, &fields).await?)
        }
        .await;

        self.finish(&tracing_ctx, method, result, |_| {
            format!("Created {} row", entity.name)
        })
    }

    async fn delete(&self, entity: &str, id: &str) -> Result<(), ServiceError> {
        let entity = resolve(entity)?;
        let method = Method::Delete;
        let tracing_ctx = self.tracer.start_tracing(
            "AdminDelete",
            vec![
                KeyValue::new("entity", entity.name),
                KeyValue::new("id", id.to_string()),
            ],
        );

        let result = self
            .repo
            .delete(entity, id)
            .await
            .map_err(ServiceError::Repo);

        if result.is_ok() {
            info!("🗑️ Admin deleted {} {id}", entity.name);
        }

        self.finish(&tracing_ctx, method, result, |_| {
            format!("Deleted {} {id}", entity.name)
        })
    }
}
