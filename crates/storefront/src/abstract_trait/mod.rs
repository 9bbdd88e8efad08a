pub mod admin;
pub mod gateway;
pub mod order;
pub mod order_item;
pub mod payment;
pub mod webhook;
