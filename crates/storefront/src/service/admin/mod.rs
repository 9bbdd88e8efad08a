mod auth;
mod service;

pub use self::auth::AdminAuthService;
pub use self::service::AdminService;
