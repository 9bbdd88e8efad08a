use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

fn default_page() -> i32 {
    1
}

fn default_page_size() -> i32 {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AdminLoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, IntoParams)]
pub struct AdminListQuery {
    /// Case-insensitive match against the entity's searchable columns.
    pub search: Option<String>,

    /// Exact match against the entity's status column, when it has one.
    pub status: Option<String>,

    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: i32,

    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_page_size", rename = "page_size")]
    pub page_size: i32,
}

impl Default for AdminListQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}
