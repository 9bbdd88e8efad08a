use crate::{
    abstract_trait::admin::AdminRepositoryTrait,
    domain::{
        admin_entity::AdminEntity,
        requests::{admin::AdminListQuery, page_window},
    },
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info, warn};

/// Generic row access for the admin console. Rows are read as `to_jsonb`
/// and written through `jsonb_populate_record`, so Postgres does the
/// per-column type conversion.
#[derive(Clone)]
pub struct AdminRepository {
    db: ConnectionPool,
}

impl AdminRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

fn search_clause(entity: &AdminEntity) -> String {
    if entity.search_columns.is_empty() {
        return "$1::text IS NULL".to_string();
    }

    let matches = entity
        .search_columns
        .iter()
        .map(|column| format!("t.{column}::text ILIKE $1"))
        .collect::<Vec<_>>()
        .join(" OR ");

    format!("($1::text IS NULL OR {matches})")
}

fn status_clause(entity: &AdminEntity) -> String {
    match entity.status_column {
        Some(column) => format!("($2::text IS NULL OR t.{column} = $2)"),
        None => "$2::text IS NULL".to_string(),
    }
}

fn list_sql(entity: &AdminEntity) -> String {
    format!(
        "SELECT to_jsonb(t.*) AS data, COUNT(*) OVER() AS total_count \
         FROM {table} t \
         WHERE {search} AND {status} \
         ORDER BY {order_by} \
         LIMIT $3 OFFSET $4",
        table = entity.table,
        search = search_clause(entity),
        status = status_clause(entity),
        order_by = entity.order_by,
    )
}

fn update_sql(entity: &AdminEntity, columns: &[&'static str]) -> String {
    let targets = columns.join(", ");
    let sources = columns
        .iter()
        .map(|column| format!("r.{column}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "UPDATE {table} AS t \
         SET ({targets}, updated_at) = \
             (SELECT {sources}, current_timestamp FROM jsonb_populate_record(NULL::{table}, $1) r) \
         WHERE t.{id}::text = $2 \
         RETURNING to_jsonb(t.*)",
        table = entity.table,
        id = entity.id_column,
    )
}

fn insert_sql(entity: &AdminEntity, columns: &[&'static str]) -> String {
    let targets = columns.join(", ");
    let sources = columns
        .iter()
        .map(|column| format!("r.{column}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {table} AS t ({targets}) \
         SELECT {sources} FROM jsonb_populate_record(NULL::{table}, $1) r \
         RETURNING to_jsonb(t.*)",
        table = entity.table,
    )
}

#[async_trait]
impl AdminRepositoryTrait for AdminRepository {
    async fn list(
        &self,
        entity: &'static AdminEntity,
        query: &AdminListQuery,
    ) -> Result<(Vec<Value>, i64), RepositoryError> {
        info!(
            "🔍 Listing {} | Page: {}, Size: {}, Search: {:?}, Status: {:?}",
            entity.name, query.page, query.page_size, query.search, query.status
        );

        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));
        let status = query
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let (limit, offset) = page_window(query.page, query.page_size);

        let rows = sqlx::query_as::<_, (Value, i64)>(&list_sql(entity))
            .bind(search)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to list {}: {:?}", entity.name, e);
                RepositoryError::from(e)
            })?;

        let total = rows.first().map(|(_, total)| *total).unwrap_or(0);
        let items = rows.into_iter().map(|(row, _)| row).collect();

        Ok((items, total))
    }

    async fn find_by_id(
        &self,
        entity: &'static AdminEntity,
        id: &str,
    ) -> Result<Option<Value>, RepositoryError> {
        let sql = format!(
            "SELECT to_jsonb(t.*) FROM {table} t WHERE t.{id_column}::text = $1",
            table = entity.table,
            id_column = entity.id_column,
        );

        sqlx::query_scalar::<_, Value>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch {} {}: {:?}", entity.name, id, e);
                RepositoryError::from(e)
            })
    }

    async fn update(
        &self,
        entity: &'static AdminEntity,
        id: &str,
        columns: &[&'static str],
        fields: &Map<String, Value>,
    ) -> Result<Option<Value>, RepositoryError> {
        let row = sqlx::query_scalar::<_, Value>(&update_sql(entity, columns))
            .bind(Value::Object(fields.clone()))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to update {} {}: {:?}", entity.name, id, e);
                RepositoryError::from(e)
            })?;

        if row.is_some() {
            info!("🔄 Updated {} {} ({})", entity.name, id, columns.join(", "));
        }

        Ok(row)
    }

    async fn create(
        &self,
        entity: &'static AdminEntity,
        columns: &[&'static str],
        fields: &Map<String, Value>,
    ) -> Result<Value, RepositoryError> {
        let row = sqlx::query_scalar::<_, Value>(&insert_sql(entity, columns))
            .bind(Value::Object(fields.clone()))
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to create {}: {:?}", entity.name, e);
                RepositoryError::from(e)
            })?;

        info!("✅ Created {} row", entity.name);
        Ok(row)
    }

    async fn delete(&self, entity: &'static AdminEntity, id: &str) -> Result<(), RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        for (ref_table, ref_column) in entity.references {
            let sql = format!("SELECT COUNT(*) FROM {ref_table} WHERE {ref_column}::text = $1");
            let count: i64 = sqlx::query_scalar(&sql)
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(RepositoryError::from)?;

            if count > 0 {
                warn!(
                    "⚠️ Refusing to delete {} {}: referenced by {} {} row(s)",
                    entity.name, id, count, ref_table
                );
                return Err(RepositoryError::Conflict(format!(
                    "Cannot delete {} {id}: still referenced by {count} {ref_table} row(s)",
                    entity.name
                )));
            }
        }

        let sql = format!(
            "DELETE FROM {table} WHERE {id_column}::text = $1",
            table = entity.table,
            id_column = entity.id_column,
        );

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete {} {}: {:?}", entity.name, id, e);
                RepositoryError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        info!("🗑️ Deleted {} {}", entity.name, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_filters_on_registered_columns_only() {
        let orders = AdminEntity::find("orders").unwrap();
        let sql = list_sql(orders);

        assert!(sql.contains("FROM orders t"));
        assert!(sql.contains("t.customer_email::text ILIKE $1"));
        assert!(sql.contains("t.payment_status = $2"));
        assert!(sql.contains("ORDER BY t.created_at DESC"));
    }

    #[test]
    fn update_always_touches_updated_at() {
        let services = AdminEntity::find("services").unwrap();
        let sql = update_sql(services, &["price"]);

        assert!(sql.contains("SET (price, updated_at) ="));
        assert!(sql.contains("SELECT r.price, current_timestamp"));
        assert!(sql.contains("jsonb_populate_record(NULL::services, $1)"));
    }
}
