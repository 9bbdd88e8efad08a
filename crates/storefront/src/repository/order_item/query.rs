use crate::{
    abstract_trait::order_item::repository::OrderItemQueryRepositoryTrait,
    model::order_item::OrderItem as OrderItemModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderItemQueryRepository {
    db: ConnectionPool,
}

impl OrderItemQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderItemQueryRepositoryTrait for OrderItemQueryRepository {
    async fn find_by_order(&self, order_id: &str) -> Result<Vec<OrderItemModel>, RepositoryError> {
        info!("📦 Fetching order items for order_id: {}", order_id);

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let items = sqlx::query_as::<_, OrderItemModel>(
            r#"
            SELECT *
            FROM order_items
            WHERE order_id = $1
            ORDER BY item_type ASC, line_index ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to fetch order items for order_id {}: {:?}",
                order_id, e
            );
            RepositoryError::from(e)
        })?;

        Ok(items)
    }
}
