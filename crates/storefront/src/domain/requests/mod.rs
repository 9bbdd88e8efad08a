pub mod admin;
pub mod order;
pub mod payment_intent;

/// SQL `LIMIT` and `OFFSET` for a 1-based page. Computed in `i64` so a
/// large but valid page number yields an empty page rather than overflow.
pub fn page_window(page: i32, page_size: i32) -> (i64, i64) {
    let limit = i64::from(page_size.max(0));
    let offset = (i64::from(page) - 1).max(0) * limit;
    (limit, offset)
}
