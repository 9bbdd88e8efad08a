pub mod admin;
pub mod order;
pub mod order_item;
