//! Paginated result envelope and pagination arithmetic.
//!
//! A [`Page`] is constructed fresh on every successful fetch or cache hit
//! and never mutated afterwards; a new page replaces the old one. Clients
//! produce `Page<serde_json::Value>` (raw upstream records), providers adapt
//! it into `Page<User>` with [`Page::map`].

use serde::{Deserialize, Serialize};

/// One page of records plus the pagination metadata describing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    records: Vec<T>,
    page: u32,
    per_page: u32,
    total: u64,
    total_pages: u32,
}

impl<T> Page<T> {
    /// Create a page from records and upstream-reported (or estimated) totals.
    pub fn new(records: Vec<T>, page: u32, per_page: u32, total: u64, total_pages: u32) -> Self {
        Self {
            records,
            page,
            per_page,
            total,
            total_pages,
        }
    }

    /// An empty page with zero totals, used as the degraded result on failure.
    pub fn empty(page: u32, per_page: u32) -> Self {
        Self::new(Vec::new(), page, per_page, 0, 0)
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Convert every record while keeping order and pagination metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            records: self.records.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Clamp a page number or page size to the minimum of 1.
///
/// Pagination math divides by `per_page` and subtracts 1 from `page`, so
/// zero values are clamped before any of it runs.
pub fn clamp_index(value: u32) -> u32 {
    value.max(1)
}

/// Number of pages needed to cover `total` records at `per_page` each.
pub fn page_count(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(clamp_index(per_page));
    total.div_ceil(per_page).min(u64::from(u32::MAX)) as u32
}

/// Slice one page out of a full collection.
///
/// Used by sources without native pagination: the upstream returns the whole
/// collection and the client paginates locally.
pub fn paginate<T>(records: Vec<T>, page: u32, per_page: u32) -> Vec<T> {
    let page = clamp_index(page);
    let per_page = clamp_index(per_page);
    let offset = (page as usize - 1).saturating_mul(per_page as usize);
    records
        .into_iter()
        .skip(offset)
        .take(per_page as usize)
        .collect()
}
