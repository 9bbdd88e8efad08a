pub mod admin_entity;
pub mod event;
pub mod line_item;
pub mod requests;
pub mod response;
pub mod status;
