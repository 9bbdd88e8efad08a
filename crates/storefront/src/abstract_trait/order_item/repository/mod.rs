mod command;
mod query;

pub use self::command::{DynOrderItemCommandRepository, OrderItemCommandRepositoryTrait};
pub use self::query::{DynOrderItemQueryRepository, OrderItemQueryRepositoryTrait};
