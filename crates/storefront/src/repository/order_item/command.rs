use crate::{
    abstract_trait::order_item::repository::OrderItemCommandRepositoryTrait,
    domain::requests::order::CreateOrderItemRecord,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

/// Redelivered events hit the natural key and insert nothing.
const INSERT_ITEM_SQL: &str = r#"
    INSERT INTO order_items (
        order_id, item_type, line_index, name, unit_price,
        quantity, total_price, currency, metadata, created_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, current_timestamp)
    ON CONFLICT (order_id, item_type, line_index) DO NOTHING
"#;

pub struct OrderItemCommandRepository {
    db: ConnectionPool,
}

impl OrderItemCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderItemCommandRepositoryTrait for OrderItemCommandRepository {
    async fn insert_items(&self, items: &[CreateOrderItemRecord]) -> Result<u64, RepositoryError> {
        if items.is_empty() {
            return Ok(0);
        }

        let mut tx = self.db.begin().await.map_err(|e| {
            error!("❌ Failed to begin order item transaction: {:?}", e);
            RepositoryError::from(e)
        })?;

        let mut inserted = 0;

        for item in items {
            let result = sqlx::query(INSERT_ITEM_SQL)
            .bind(&item.order_id)
            .bind(item.item_type.as_str())
            .bind(item.line_index)
            .bind(&item.name)
            .bind(item.unit_price)
            .bind(item.quantity)
            .bind(item.total_price)
            .bind(&item.currency)
            .bind(&item.metadata)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(
                    "❌ Failed to insert {} #{} for order {}: {:?}",
                    item.item_type, item.line_index, item.order_id, e
                );
                RepositoryError::from(e)
            })?;

            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            "✅ Inserted {inserted} of {} order items for order {}",
            items.len(),
            items[0].order_id
        );
        Ok(inserted)
    }
}
