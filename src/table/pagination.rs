use serde::{Deserialize, Serialize};

use super::TableError;

/// Page sizes offered when the caller does not supply its own set.
pub const DEFAULT_PAGE_SIZES: [u32; 3] = [5, 10, 25];

/// Pagination state as seen by the table.
///
/// `current_page` is 1-indexed everywhere except at the rendering boundary,
/// where [`Pagination::display_page`] converts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: u32,
    pub total_items: u64,
}

impl Pagination {
    pub fn new(current_page: u32, page_size: u32, total_items: u64) -> Self {
        Self {
            current_page: current_page.max(1),
            page_size: page_size.max(1),
            total_items,
        }
    }

    /// Zero-indexed page shown by page controls.
    pub fn display_page(&self) -> u32 {
        self.current_page.saturating_sub(1)
    }

    /// Converts a zero-indexed page control index back to a 1-indexed page.
    pub fn page_from_display(index: u32) -> u32 {
        index.saturating_add(1)
    }

    pub fn page_count(&self) -> u32 {
        let pages = self.total_items.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Number of rows that precede the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.display_page()) * u64::from(self.page_size)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.current_page) * u64::from(self.page_size) < self.total_items
    }

    /// 1-based inclusive range of item positions on the current page, e.g.
    /// `(6, 10)` for page 2 of size 5. `None` when the page holds no items.
    pub fn item_range(&self) -> Option<(u64, u64)> {
        let start = self.offset() + 1;
        if start > self.total_items {
            return None;
        }
        let end = (self.offset() + u64::from(self.page_size)).min(self.total_items);
        Some((start, end))
    }
}

/// Closed set of page sizes a table accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSizeOptions(Vec<u32>);

impl PageSizeOptions {
    pub fn new(sizes: impl IntoIterator<Item = u32>) -> Result<Self, TableError> {
        let mut sizes: Vec<u32> = sizes.into_iter().collect();
        if sizes.is_empty() || sizes.contains(&0) {
            return Err(TableError::InvalidPageSizes);
        }
        sizes.sort_unstable();
        sizes.dedup();
        Ok(Self(sizes))
    }

    pub fn contains(&self, size: u32) -> bool {
        self.0.contains(&size)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl Default for PageSizeOptions {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZES.to_vec())
    }
}
