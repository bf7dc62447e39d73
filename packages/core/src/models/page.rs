//! Pagination Types
//!
//! Zero-based page request and page-of-results shapes shared by the store
//! trait and the service layer.

use serde::Serialize;

/// A zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, starting at 0
    pub page: u32,
    /// Maximum number of elements per page
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Index of the first element on this page.
    pub fn offset(&self) -> usize {
        self.page as usize * self.size as usize
    }
}

/// One page of results plus the total match count across all pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
        }
    }

    /// Slice an already-ordered full result set down to the requested page.
    pub fn from_vec(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len() as u64;
        let start = request.offset().min(items.len());
        let end = (start + request.size as usize).min(items.len());
        let content = items.into_iter().skip(start).take(end - start).collect();
        Self::new(content, request, total)
    }

    /// Convert the page contents while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;
