use crate::{
    abstract_trait::order::repository::OrderCommandRepositoryTrait,
    domain::requests::order::{CreatePendingOrderRecord, UpsertOrderPaymentRecord},
    model::order::Order as OrderModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn create_pending(
        &self,
        req: &CreatePendingOrderRecord,
    ) -> Result<OrderModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, OrderModel>(
            r#"
            INSERT INTO orders (
                order_id, total_amount, currency, payment_status,
                customer_name, customer_email, customer_phone,
                applications_count, services_count, line_items,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, 'pending', $4, $5, $6, $7, $8, $9, current_timestamp, current_timestamp)
            RETURNING *
            "#,
        )
        .bind(&req.order_id)
        .bind(req.total_amount)
        .bind(&req.currency)
        .bind(&req.customer_name)
        .bind(&req.customer_email)
        .bind(&req.customer_phone)
        .bind(req.applications_count)
        .bind(req.services_count)
        .bind(&req.line_items)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to create pending order {}: {:?}", req.order_id, err);
            RepositoryError::from(err)
        })?;

        info!("✅ Created pending order {}", result.order_id);
        Ok(result)
    }

    async fn upsert_payment(
        &self,
        req: &UpsertOrderPaymentRecord,
    ) -> Result<OrderModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, OrderModel>(
            r#"
            INSERT INTO orders AS o (
                order_id, total_amount, currency, payment_status, payment_intent_id,
                customer_name, customer_email, customer_phone,
                applications_count, services_count, line_items, payment_metadata,
                paid_at, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                current_timestamp, current_timestamp
            )
            ON CONFLICT (order_id) DO UPDATE SET
                total_amount       = EXCLUDED.total_amount,
                currency           = EXCLUDED.currency,
                payment_status     = EXCLUDED.payment_status,
                payment_intent_id  = EXCLUDED.payment_intent_id,
                customer_name      = COALESCE(EXCLUDED.customer_name, o.customer_name),
                customer_email     = COALESCE(EXCLUDED.customer_email, o.customer_email),
                customer_phone     = COALESCE(EXCLUDED.customer_phone, o.customer_phone),
                applications_count = EXCLUDED.applications_count,
                services_count     = EXCLUDED.services_count,
                line_items         = EXCLUDED.line_items,
                payment_metadata   = EXCLUDED.payment_metadata,
                paid_at            = COALESCE(EXCLUDED.paid_at, o.paid_at),
                updated_at         = current_timestamp
            RETURNING *
            "#,
        )
        .bind(&req.order_id)
        .bind(req.total_amount)
        .bind(&req.currency)
        .bind(req.payment_status.as_str())
        .bind(&req.payment_intent_id)
        .bind(&req.customer_name)
        .bind(&req.customer_email)
        .bind(&req.customer_phone)
        .bind(req.applications_count)
        .bind(req.services_count)
        .bind(&req.line_items)
        .bind(&req.payment_metadata)
        .bind(req.paid_at)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to upsert order {} as {}: {:?}",
                req.order_id, req.payment_status, err
            );
            RepositoryError::from(err)
        })?;

        info!(
            "🔄 Order {} is now {}",
            result.order_id, result.payment_status
        );
        Ok(result)
    }
}
