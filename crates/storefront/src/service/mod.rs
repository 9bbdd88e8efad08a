pub mod admin;
pub mod order;
pub mod payment_intent;
pub mod reconciler;
pub mod webhook;
