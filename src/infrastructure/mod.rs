//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - Clock abstraction (system time vs mock)
//! - Cache stores (in-memory DashMap, optional Redis)
//! - The blocking HTTP transport
//! - The concrete per-source clients and adapters

pub mod cache;
pub mod clock;
pub mod sources;
pub mod transport;

#[cfg(feature = "redis-cache")]
pub mod redis_cache;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is enabled,
/// or during test builds. It provides controllable test doubles for testing
/// caching and aggregation behavior.
///
/// To use these mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// user-fanout = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
