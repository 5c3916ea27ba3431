//! Composite aggregation across all registered providers.
//!
//! The composite fans out the same `(page, per_page)` request to every
//! provider, merges whatever comes back, and orders the union
//! deterministically. Providers are independent; one misbehaving provider
//! is skipped, never fatal.

use crate::application::provider::UserProvider;
use crate::domain::page::Page;
use crate::domain::user::User;
use std::panic;
use tracing::error;

/// Aggregates users from every registered provider.
///
/// Registration is keyed by provider name: re-registering a name replaces
/// the previous provider in place, keeping its original position so the
/// fan-out order stays stable.
#[derive(Default)]
pub struct CompositeProvider {
    providers: Vec<Box<dyn UserProvider>>,
}

impl CompositeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider; the last registration under a name wins.
    pub fn add_provider(&mut self, provider: Box<dyn UserProvider>) -> &mut Self {
        match self
            .providers
            .iter_mut()
            .find(|existing| existing.name() == provider.name())
        {
            Some(slot) => *slot = provider,
            None => self.providers.push(provider),
        }
        self
    }

    /// Names of the registered providers, in fan-out order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Call `op` on a provider with panics contained.
    ///
    /// Providers promise not to fail, but external implementations are
    /// untrusted; a panicking provider is logged and skipped.
    fn guarded<R>(provider: &dyn UserProvider, what: &str, op: impl FnOnce() -> R) -> Option<R> {
        match panic::catch_unwind(panic::AssertUnwindSafe(op)) {
            Ok(result) => Some(result),
            Err(_) => {
                error!(provider = %provider.name(), operation = what, "provider panicked; skipping");
                None
            }
        }
    }
}

impl UserProvider for CompositeProvider {
    /// Fan out, concatenate, then stable-sort ascending by id.
    ///
    /// Ids are only unique per source, so duplicates across sources are
    /// expected and kept; ties keep concatenation order. The envelope
    /// reports the sum of the succeeded providers' totals and the deepest
    /// page count among them.
    fn fetch_users(&self, page: u32, per_page: u32) -> Page<User> {
        let mut merged: Vec<User> = Vec::new();
        let mut total: u64 = 0;
        let mut total_pages: u32 = 0;

        for provider in &self.providers {
            let Some(result) =
                Self::guarded(provider.as_ref(), "fetch_users", || {
                    provider.fetch_users(page, per_page)
                })
            else {
                continue;
            };
            total = total.saturating_add(result.total());
            total_pages = total_pages.max(result.total_pages());
            merged.extend(result.into_records());
        }

        merged.sort_by_key(User::id);

        Page::new(merged, page, per_page, total, total_pages)
    }

    /// The aggregate must paginate deep enough for the longest source.
    fn total_pages(&self, per_page: u32) -> u32 {
        self.providers
            .iter()
            .filter_map(|provider| {
                Self::guarded(provider.as_ref(), "total_pages", || {
                    provider.total_pages(per_page)
                })
            })
            .max()
            .unwrap_or(0)
    }

    fn total_users(&self) -> u64 {
        self.providers
            .iter()
            .filter_map(|provider| {
                Self::guarded(provider.as_ref(), "total_users", || provider.total_users())
            })
            .fold(0u64, u64::saturating_add)
    }

    fn name(&self) -> &str {
        "composite"
    }
}
