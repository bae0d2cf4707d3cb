//! Page-number to row-window mapping and page metadata.
//!
//! Pages are 1-indexed. An empty collection still reports one page.

use serde::Serialize;

/// Fixed page size shared by every listing.
pub const PAGE_SIZE: u32 = 100;

/// Row window applied to the final page statement only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    pub(crate) fn offset_i64(self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }

    pub(crate) fn limit_i64(self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }
}

/// `{count, pages}` envelope served next to every listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub count: u64,
    pub pages: Vec<u32>,
}

impl PageSummary {
    pub fn max_page(&self) -> u32 {
        self.pages.last().copied().unwrap_or(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Zero is coerced to [`PAGE_SIZE`].
    pub fn new(page_size: u32) -> Self {
        if page_size == 0 {
            return Self::default();
        }
        Self { page_size }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Rows to skip before `page`. Pages below 1 are treated as page 1.
    pub fn skip(&self, page: u32) -> u64 {
        u64::from(self.page_size) * u64::from(page.max(1) - 1)
    }

    pub fn window(&self, page: u32) -> PageWindow {
        PageWindow::new(self.skip(page), u64::from(self.page_size))
    }

    /// `ceil(count / page_size)`, floored at 1.
    pub fn max_page(&self, count: u64) -> u32 {
        let pages = count.div_ceil(u64::from(self.page_size)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn summarize(&self, count: u64) -> PageSummary {
        PageSummary {
            count,
            pages: (1..=self.max_page(count)).collect(),
        }
    }
}
