//! Per-source provider: the first resilience boundary.
//!
//! A [`SourceProvider`] composes exactly one client with exactly one
//! adapter. Its contract is failure-free: typed client errors and panics
//! alike are logged and converted into an empty page or zero total, so one
//! unreachable source can never abort the whole aggregation.

use crate::application::adapter::UserAdapter;
use crate::application::client::SourceClient;
use crate::domain::page::Page;
use crate::domain::user::User;
use serde_json::Value;
use std::panic;
use tracing::error;

/// Contract the aggregator consumes.
///
/// Implementations must not fail: any internal failure degrades to an empty
/// page or a zero count.
pub trait UserProvider: Send + Sync {
    /// Fetch one page of users; empty zero-total page on any failure.
    fn fetch_users(&self, page: u32, per_page: u32) -> Page<User>;

    /// Total pages this provider can serve at the given size; 0 on failure.
    fn total_pages(&self, per_page: u32) -> u32;

    /// Total users this provider can serve; 0 on failure.
    fn total_users(&self) -> u64;

    /// Stable identifier, used as the registration key.
    fn name(&self) -> &str;
}

/// Provider over one upstream source.
pub struct SourceProvider {
    name: String,
    client: Box<dyn SourceClient>,
    adapter: Box<dyn UserAdapter>,
}

impl SourceProvider {
    /// Compose a client and an adapter under a stable provider name.
    pub fn new(
        name: impl Into<String>,
        client: Box<dyn SourceClient>,
        adapter: Box<dyn UserAdapter>,
    ) -> Self {
        Self {
            name: name.into(),
            client,
            adapter,
        }
    }

    /// Run `op` with panics contained, degrading to `fallback()`.
    fn guarded<R>(&self, what: &str, op: impl FnOnce() -> R, fallback: impl FnOnce() -> R) -> R {
        match panic::catch_unwind(panic::AssertUnwindSafe(op)) {
            Ok(result) => result,
            Err(_) => {
                error!(provider = %self.name, operation = what, "provider panicked; degrading to empty result");
                fallback()
            }
        }
    }
}

impl UserProvider for SourceProvider {
    fn fetch_users(&self, page: u32, per_page: u32) -> Page<User> {
        self.guarded(
            "fetch_users",
            || match self.client.fetch_page(page, per_page) {
                Ok(raw) => raw.map(|record| {
                    let mut user = self.adapter.convert_to_user(&record);
                    user.insert_metadata("source", Value::from(self.name.as_str()));
                    user
                }),
                Err(err) => {
                    error!(
                        provider = %self.name,
                        kind = err.kind(),
                        error = %err,
                        "fetch failed; returning empty page"
                    );
                    Page::empty(page, per_page)
                }
            },
            || Page::empty(page, per_page),
        )
    }

    fn total_pages(&self, per_page: u32) -> u32 {
        self.guarded(
            "total_pages",
            || match self.client.total_pages(per_page) {
                Ok(pages) => pages,
                Err(err) => {
                    error!(provider = %self.name, kind = err.kind(), error = %err, "total_pages failed");
                    0
                }
            },
            || 0,
        )
    }

    fn total_users(&self) -> u64 {
        self.guarded(
            "total_users",
            || match self.client.total_users() {
                Ok(total) => total,
                Err(err) => {
                    error!(provider = %self.name, kind = err.kind(), error = %err, "total_users failed");
                    0
                }
            },
            || 0,
        )
    }

    fn name(&self) -> &str {
        &self.name
    }
}
