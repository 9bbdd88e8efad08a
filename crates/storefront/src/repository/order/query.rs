use crate::{
    abstract_trait::order::repository::OrderQueryRepositoryTrait,
    domain::requests::{order::FindAllOrders, page_window},
    model::order::Order as OrderModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::FromRow;
use tracing::{error, info};

#[derive(FromRow)]
struct OrderWithTotal {
    #[sqlx(flatten)]
    order: OrderModel,
    total_count: i64,
}

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllOrders,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        info!(
            "🔍 Fetching orders | Page: {}, Size: {}, Search: {:?}, Status: {:?}",
            req.page, req.page_size, req.search, req.status
        );

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let (limit, offset) = page_window(req.page, req.page_size);

        let search_pattern = if req.search.trim().is_empty() {
            None
        } else {
            Some(format!("%{}%", req.search.trim()))
        };

        let rows = sqlx::query_as::<_, OrderWithTotal>(
            r#"
            SELECT o.*, COUNT(*) OVER() AS total_count
            FROM orders o
            WHERE ($1::text IS NULL
                   OR o.order_id ILIKE $1
                   OR o.customer_name ILIKE $1
                   OR o.customer_email ILIKE $1)
              AND ($2::text IS NULL OR o.payment_status = $2)
            ORDER BY o.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(search_pattern)
        .bind(req.status.map(|status| status.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch orders: {:?}", e);
            RepositoryError::from(e)
        })?;

        let total = rows.first().map(|row| row.total_count).unwrap_or(0);
        let orders = rows.into_iter().map(|row| row.order).collect();

        Ok((orders, total))
    }

    async fn find_by_id(&self, order_id: &str) -> Result<Option<OrderModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let order = sqlx::query_as::<_, OrderModel>("SELECT * FROM orders WHERE order_id = $1")
            .bind(order_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch order {}: {:?}", order_id, e);
                RepositoryError::from(e)
            })?;

        Ok(order)
    }
}
