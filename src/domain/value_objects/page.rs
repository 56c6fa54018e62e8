//! Offset pagination primitives shared by repositories and services.

use serde::Serialize;

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Clamp `size` into `1..=max_size`.
    pub fn clamped(self, max_size: u32) -> Self {
        Self {
            page: self.page,
            size: self.size.clamp(1, max_size.max(1)),
        }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

/// One page of results together with the total row count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let size = u64::from(request.size.max(1));
        Self {
            items,
            page: request.page,
            size: request.size,
            total,
            total_pages: total.div_ceil(size) as u32,
        }
    }

    /// Convert every item, keeping the paging metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}
