// ABOUTME: Page-based pagination requests and metadata for food search results
// ABOUTME: Exact metadata when a total is known, heuristic metadata when it is not
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

use serde::{Deserialize, Serialize};

/// Smallest accepted page size
pub const MIN_PAGE_SIZE: u32 = 1;
/// Largest accepted page size
pub const MAX_PAGE_SIZE: u32 = 200;
/// Page size applied when a caller does not supply one
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Items per page, within `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`
    pub page_size: u32,
}

impl PageRequest {
    /// Build a page request, applying defaults for absent values
    #[must_use]
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Storage offset for this page
    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination metadata attached to every provider and aggregated response.
///
/// `total_items` and `total_pages` are absent when the backing store cannot
/// report a total cheaply; `has_next_page`/`has_previous_page` are always
/// present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// 1-based page number
    pub page: u32,
    /// Items per page
    pub page_size: u32,
    /// Total matching items, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    /// Total pages, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    /// Whether a following page exists (or is assumed to)
    pub has_next_page: bool,
    /// Whether a preceding page exists
    pub has_previous_page: bool,
}

impl PageMetadata {
    /// Exact metadata computed from a known total.
    ///
    /// `has_next_page` is true iff `page * page_size < total_items`.
    #[must_use]
    pub fn exact(page: u32, page_size: u32, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(u64::from(page_size.max(1)));
        Self {
            page,
            page_size,
            total_items: Some(total_items),
            total_pages: Some(total_pages),
            has_next_page: u64::from(page) * u64::from(page_size) < total_items,
            has_previous_page: page > 1,
        }
    }

    /// Heuristic metadata for stores without a cheap count.
    ///
    /// A full page is assumed to have a successor; this over-reports when
    /// the data ends exactly on a page boundary.
    #[must_use]
    pub fn heuristic(page: u32, page_size: u32, returned: usize) -> Self {
        Self {
            page,
            page_size,
            total_items: None,
            total_pages: None,
            has_next_page: returned as u64 == u64::from(page_size),
            has_previous_page: page > 1,
        }
    }

    /// Metadata for an empty result set
    #[must_use]
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self::exact(page, page_size, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_totals() {
        let meta = PageMetadata::exact(1, 10, 25);
        assert_eq!(meta.total_pages, Some(3));
        assert!(meta.has_next_page);
        assert!(!meta.has_previous_page);

        let meta = PageMetadata::exact(3, 10, 25);
        assert!(!meta.has_next_page);
        assert!(meta.has_previous_page);
    }

    #[test]
    fn exact_boundary_is_precise() {
        // 20 items at page size 10: page 2 is the last page.
        let meta = PageMetadata::exact(2, 10, 20);
        assert_eq!(meta.total_pages, Some(2));
        assert!(!meta.has_next_page);
    }

    #[test]
    fn heuristic_full_page_assumes_more() {
        let meta = PageMetadata::heuristic(1, 10, 10);
        assert!(meta.has_next_page);
        assert_eq!(meta.total_items, None);

        let meta = PageMetadata::heuristic(2, 10, 7);
        assert!(!meta.has_next_page);
        assert!(meta.has_previous_page);
    }

    #[test]
    fn empty_metadata() {
        let meta = PageMetadata::empty(1, 25);
        assert_eq!(meta.total_items, Some(0));
        assert_eq!(meta.total_pages, Some(0));
        assert!(!meta.has_next_page);
        assert!(!meta.has_previous_page);
    }

    #[test]
    fn offset_math() {
        assert_eq!(PageRequest { page: 1, page_size: 10 }.offset(), 0);
        assert_eq!(PageRequest { page: 3, page_size: 15 }.offset(), 30);
    }

    #[test]
    fn metadata_serializes_camel_case() {
        let json = serde_json::to_value(PageMetadata::exact(1, 10, 5)).unwrap();
        assert!(json.get("pageSize").is_some());
        assert!(json.get("hasNextPage").is_some());
        assert!(json.get("totalItems").is_some());
    }
}
