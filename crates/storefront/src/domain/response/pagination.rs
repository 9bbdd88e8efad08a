use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct Pagination {
    pub page: i32,
    pub page_size: i32,
    pub total_items: i64,
    pub total_pages: i32,
}

impl Pagination {
    pub fn new(page: i32, page_size: i32, total_items: i64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = (total_items + page_size as i64 - 1) / page_size as i64;

        Self {
            page,
            page_size,
            total_items,
            total_pages: i32::try_from(total_pages).unwrap_or(i32::MAX),
        }
    }
}
