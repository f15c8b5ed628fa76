//! Response wrappers shared across handlers.

use serde::Serialize;

/// Paginated listing, the shape the SPA's client table expects:
///
/// ```json
/// {
///   "items": [ ... ],
///   "page": 1,
///   "pageSize": 10,
///   "total": 42,
///   "totalPages": 5
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(u64::from(page_size)) as u32
        };
        Self {
            items,
            page,
            page_size,
            total,
            total_pages,
        }
    }
}
