pub mod admin;
pub mod api;
pub mod order;
pub mod pagination;
pub mod payment_intent;
