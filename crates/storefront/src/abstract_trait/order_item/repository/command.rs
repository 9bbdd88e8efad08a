use crate::domain::requests::order::CreateOrderItemRecord;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderItemCommandRepository = Arc<dyn OrderItemCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderItemCommandRepositoryTrait {
    /// Rows whose `(order_id, item_type, line_index)` already exist are
    /// skipped. Returns how many rows were actually inserted.
    async fn insert_items(&self, items: &[CreateOrderItemRecord]) -> Result<u64, RepositoryError>;
}
