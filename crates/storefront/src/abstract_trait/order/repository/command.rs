use crate::{
    domain::requests::order::{CreatePendingOrderRecord, UpsertOrderPaymentRecord},
    model::order::Order as OrderModel,
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Fails with `AlreadyExists` when the order id is taken.
    async fn create_pending(
        &self,
        req: &CreatePendingOrderRecord,
    ) -> Result<OrderModel, RepositoryError>;

    /// Insert-or-update keyed on `order_id`; the latest event wins.
    async fn upsert_payment(
        &self,
        req: &UpsertOrderPaymentRecord,
    ) -> Result<OrderModel, RepositoryError>;
}
