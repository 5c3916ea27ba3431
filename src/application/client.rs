//! Source client contract and the shared fetch-through-cache path.
//!
//! Every upstream source gets one [`SourceClient`] implementation. The
//! clients differ in URL shape, query parameters, payload structure, and
//! cache lifetime; the cache lookup and store-back are identical and live
//! in [`fetch_with_cache`] so each client only supplies the upstream call
//! and its budget-derived lifetime.

use crate::application::ports::{Cache, Clock, TransportError, TransportResponse};
use crate::domain::budget::RateLimitBudget;
use crate::domain::error::ApiError;
use crate::domain::page::Page;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Contract every per-source client fulfils.
///
/// Clients fail with typed [`ApiError`]s; the provider layer above converts
/// those into empty contributions.
pub trait SourceClient: Send + Sync {
    /// Stable source identifier, used in cache keys and log fields.
    fn source_id(&self) -> &str;

    /// Fetch one page of raw records, serving from cache when possible.
    fn fetch_page(&self, page: u32, per_page: u32) -> Result<Page<Value>, ApiError>;

    /// Total number of pages the source reports (or estimates) at this size.
    fn total_pages(&self, per_page: u32) -> Result<u32, ApiError>;

    /// Total number of users the source reports (or estimates).
    fn total_users(&self) -> Result<u64, ApiError>;

    /// The configured request budget for this source.
    fn rate_limit(&self) -> RateLimitBudget;
}

/// Cache key for one `(source, page, per_page)` fetch.
pub fn cache_key(source: &str, page: u32, per_page: u32) -> String {
    format!("{}:{}:{}", source, page, per_page)
}

/// Serve a page from cache, or run `fetch` and cache its result for
/// `lifetime`.
///
/// Callers derive the lifetime from their rate-limit budget (see
/// [`RateLimitBudget::cache_lifetime`]), so scarce quota stretches it
/// automatically. Corrupt cache entries and serialization failures are
/// logged and degrade to a normal fetch; they never fail the call.
pub fn fetch_with_cache<F>(
    source: &str,
    cache: &dyn Cache,
    clock: &dyn Clock,
    lifetime: Duration,
    page: u32,
    per_page: u32,
    fetch: F,
) -> Result<Page<Value>, ApiError>
where
    F: FnOnce() -> Result<Page<Value>, ApiError>,
{
    let key = cache_key(source, page, per_page);

    if let Some(hit) = cache.get(&key) {
        match serde_json::from_str::<Page<Value>>(&hit) {
            Ok(cached) => {
                debug!(source, key = %key, "serving page from cache");
                return Ok(cached);
            }
            Err(err) => {
                // Treat a corrupt entry as a miss and refetch.
                warn!(source, key = %key, error = %err, "discarding unreadable cache entry");
            }
        }
    }

    let result = fetch()?;

    match serde_json::to_string(&result) {
        Ok(serialized) => {
            cache.set(&key, serialized, clock.now() + lifetime);
            debug!(source, key = %key, lifetime_secs = lifetime.as_secs(), "cached page");
        }
        Err(err) => {
            warn!(source, key = %key, error = %err, "failed to serialize page for caching");
        }
    }

    Ok(result)
}

/// Map a transport outcome into the response body, or a typed error.
///
/// Transport failures and non-2xx statuses both surface as
/// [`ApiError::Connection`]: from the aggregation's point of view the
/// source was unreachable either way.
pub fn require_success(
    outcome: Result<TransportResponse, TransportError>,
) -> Result<String, ApiError> {
    let response = outcome.map_err(|err| ApiError::Connection(err.to_string()))?;
    if !response.is_success() {
        return Err(ApiError::Connection(format!(
            "upstream returned HTTP {}",
            response.status
        )));
    }
    Ok(response.body)
}

/// Decode a JSON response body.
pub fn decode_body(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body)
        .map_err(|err| ApiError::DataFormat(format!("invalid JSON response: {}", err)))
}
