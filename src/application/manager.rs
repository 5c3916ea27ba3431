//! Top-level orchestration and the outermost failure boundary.
//!
//! The manager drives one aggregated fetch end to end: composite fan-out,
//! conversion to transport form, one pass through the filter pipeline, and
//! assembly of the final result. Whatever happens inside, the caller gets a
//! well-formed (possibly zero-valued) [`FilteredUsers`].

use crate::application::composite::CompositeProvider;
use crate::application::filter::FilterPipeline;
use crate::application::provider::UserProvider;
use crate::domain::user::User;
use serde::Serialize;
use serde_json::Value;
use std::panic;
use tracing::error;

/// The aggregated, filtered result handed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredUsers {
    /// Records in transport-neutral form, after the filter pipeline.
    pub data: Vec<Value>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl FilteredUsers {
    /// The zero-valued result returned for empty or failed aggregations.
    pub fn empty(page: u32, per_page: u32) -> Self {
        Self {
            data: Vec::new(),
            page,
            per_page,
            total: 0,
            total_pages: 0,
        }
    }
}

/// Orchestrates the composite provider and the filter pipeline.
pub struct UserManager {
    provider: CompositeProvider,
    filters: FilterPipeline,
}

impl UserManager {
    /// Create a manager with an empty filter pipeline.
    pub fn new(provider: CompositeProvider) -> Self {
        Self::with_filters(provider, FilterPipeline::new())
    }

    /// Create a manager with a pre-built filter pipeline.
    pub fn with_filters(provider: CompositeProvider, filters: FilterPipeline) -> Self {
        Self { provider, filters }
    }

    /// The filter pipeline, for registering additional filters.
    pub fn filters_mut(&mut self) -> &mut FilterPipeline {
        &mut self.filters
    }

    /// Fetch, filter, and package one page of aggregated users.
    ///
    /// Never fails: any panic anywhere in the chain (a provider, a filter)
    /// is logged and converted into the zero-valued result. When the
    /// aggregation comes back empty the filter pipeline is skipped
    /// entirely.
    pub fn get_filtered_users(&self, page: u32, per_page: u32) -> FilteredUsers {
        match panic::catch_unwind(panic::AssertUnwindSafe(|| self.assemble(page, per_page))) {
            Ok(result) => result,
            Err(_) => {
                error!(page, per_page, "aggregated fetch panicked; returning empty result");
                FilteredUsers::empty(page, per_page)
            }
        }
    }

    fn assemble(&self, page: u32, per_page: u32) -> FilteredUsers {
        let merged = self.provider.fetch_users(page, per_page);
        if merged.is_empty() {
            // No records means nothing to filter.
            return FilteredUsers::empty(page, per_page);
        }

        let result_page = merged.page();
        let result_per_page = merged.per_page();
        let mut total = merged.total();
        let mut total_pages = merged.total_pages();

        let records: Vec<Value> = merged.into_records().iter().map(User::to_value).collect();
        let data = self.filters.apply(records);

        // Envelope totals are authoritative when present; zero totals fall
        // back to fresh aggregate queries.
        if total == 0 {
            total = self.provider.total_users();
        }
        if total_pages == 0 {
            total_pages = self.provider.total_pages(per_page);
        }

        FilteredUsers {
            data,
            page: result_page,
            per_page: result_per_page,
            total,
            total_pages,
        }
    }

    /// Total pages across all providers; 0 on failure.
    pub fn total_pages(&self, per_page: u32) -> u32 {
        self.provider.total_pages(per_page)
    }

    /// Total users across all providers; 0 on failure.
    pub fn total_users(&self) -> u64 {
        self.provider.total_users()
    }
}
