//! Pagination math.

use serde::{Deserialize, Serialize};

use crate::types::ViewState;

/// Pagination surface exposed to the host's page controls
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-indexed current page
    pub page: usize,
    /// `None` when paging is off
    pub page_size: Option<usize>,
    pub total_pages: usize,
    pub total_count: usize,
}

impl Pagination {
    pub fn resolve(state: &ViewState, total_count: usize) -> Self {
        let total_pages = match state.page_size {
            Some(size) => total_pages(total_count, size),
            None => 1,
        };
        Self {
            page: state.page.max(1),
            page_size: state.page_size,
            total_pages,
            total_count,
        }
    }
}

/// `ceil(total_count / page_size)`; a zero page size yields zero pages.
pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size)
}

/// Slice `[(page-1)*size, page*size)` of `items`, clipped to its length.
pub fn paginate<T: Copy>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    items.iter().skip(start).take(page_size).copied().collect()
}
