//! # user-fanout
//!
//! Resilient aggregation of paginated user records from heterogeneous HTTP
//! sources.
//!
//! This crate fetches the same logical "users" listing from several
//! independent upstream APIs, normalizes each source's schema into one
//! canonical record, merges the results deterministically, and hands the
//! merged set through an extensible filter pipeline before returning it.
//! Upstream responses are cached with a lifetime that adapts to each
//! source's remaining rate-limit budget, so scarce quota automatically buys
//! longer caching.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use user_fanout::{
//!     CompositeProvider, HttpTransport, MemoryCache, SourceProvider, SystemClock, UserManager,
//! };
//! use user_fanout::infrastructure::sources::reqres::{
//!     ReqresAdapter, ReqresClient, ReqresConfig,
//! };
//! use user_fanout::infrastructure::sources::json_placeholder::{
//!     JsonPlaceholderAdapter, JsonPlaceholderClient, JsonPlaceholderConfig,
//! };
//!
//! // Shared capabilities: one transport, one cache, one clock.
//! let transport = Arc::new(HttpTransport::new());
//! let clock = Arc::new(SystemClock::new());
//! let cache = Arc::new(MemoryCache::new(clock.clone()));
//!
//! // One provider per source: client + adapter.
//! let reqres = SourceProvider::new(
//!     "reqres",
//!     Box::new(ReqresClient::new(
//!         ReqresConfig::default(),
//!         transport.clone(),
//!         cache.clone(),
//!         clock.clone(),
//!     )),
//!     Box::new(ReqresAdapter::new()),
//! );
//! let placeholder = SourceProvider::new(
//!     "jsonplaceholder",
//!     Box::new(JsonPlaceholderClient::new(
//!         JsonPlaceholderConfig::default(),
//!         transport,
//!         cache,
//!         clock,
//!     )),
//!     Box::new(JsonPlaceholderAdapter::new()),
//! );
//!
//! // Register everything and fetch one aggregated page.
//! let mut composite = CompositeProvider::new();
//! composite.add_provider(Box::new(reqres));
//! composite.add_provider(Box::new(placeholder));
//!
//! let mut manager = UserManager::new(composite);
//! manager.filters_mut().register(|records| {
//!     // Downstream policy: drop records without an email.
//!     records
//!         .into_iter()
//!         .filter(|r| r["email"].as_str().is_some_and(|e| !e.is_empty()))
//!         .collect()
//! });
//!
//! let result = manager.get_filtered_users(1, 6);
//! println!("{} of {} users", result.data.len(), result.total);
//! ```
//!
//! ## Resilience
//!
//! Failure is contained at two boundaries. Each provider converts any
//! client error or panic into an empty contribution, so one unreachable
//! source only shrinks the result. The manager is the outer boundary: it
//! always returns a well-formed (possibly zero-valued) result, whatever a
//! provider or filter does.
//!
//! ## Adaptive caching
//!
//! Every `(source, page, per_page)` fetch is cached under its own key with
//! an absolute expiry. The lifetime starts from the source's configured
//! base and doubles when the remaining rate-limit quota falls below the
//! source's scarcity threshold, trading staleness for quota preservation.
//! Rate limits are never enforced: a request is never blocked, it is just
//! cached for longer.
//!
//! ## Determinism
//!
//! Merged records are stable-sorted ascending by id, ties keeping
//! concatenation order, so the same upstream data always produces the same
//! output order no matter which source answered first. Ids are only unique
//! per source; the aggregator does not deduplicate.
//!
//! ## Architecture
//!
//! Hexagonal, in three layers: `domain` (canonical record, page envelope,
//! rate-limit budget, errors), `application` (ports, clients, providers,
//! composite, filters, manager), and `infrastructure` (system clock,
//! blocking HTTP transport, cache stores, the concrete sources, mocks).

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    budget::{RateLimitBudget, DEFAULT_SCARCITY_THRESHOLD},
    error::ApiError,
    page::Page,
    user::User,
};

pub use application::{
    adapter::UserAdapter,
    client::SourceClient,
    composite::CompositeProvider,
    filter::{FilterPipeline, UserFilter},
    manager::{FilteredUsers, UserManager},
    ports::{Cache, Clock, Transport, TransportError, TransportRequest, TransportResponse},
    provider::{SourceProvider, UserProvider},
};

pub use infrastructure::{
    cache::MemoryCache,
    clock::SystemClock,
    sources::json_placeholder::{
        JsonPlaceholderAdapter, JsonPlaceholderClient, JsonPlaceholderConfig,
    },
    sources::random_user::{RandomUserAdapter, RandomUserClient, RandomUserConfig},
    sources::reqres::{ReqresAdapter, ReqresClient, ReqresConfig},
    transport::HttpTransport,
};

#[cfg(feature = "redis-cache")]
pub use infrastructure::redis_cache::{RedisCache, RedisCacheConfig};
