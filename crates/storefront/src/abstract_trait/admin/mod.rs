mod repository;
mod service;

pub use self::repository::{AdminRepositoryTrait, DynAdminRepository};
pub use self::service::{
    AdminAuthServiceTrait, AdminServiceTrait, DynAdminAuthService, DynAdminService,
};
