//! The randomuser source: paginated, but reports no totals and no numeric
//! ids.
//!
//! Response shape: `{"results": [{"name": {"first", "last"}, "email",
//! "login": {"uuid"}, "picture": {"medium"}}, ...], "info": {"results",
//! "page", "seed"}}`. Totals are deterministic estimates, and ids are
//! synthesized from the stable login uuid.

use crate::application::adapter::UserAdapter;
use crate::application::client::{
    decode_body, fetch_with_cache, require_success, SourceClient,
};
use crate::application::ports::{Cache, Clock, Transport, TransportRequest};
use crate::domain::budget::RateLimitBudget;
use crate::domain::error::ApiError;
use crate::domain::page::{clamp_index, Page};
use crate::domain::user::User;
use crate::infrastructure::sources::str_at;
use ahash::AHasher;
use serde_json::Value;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

/// Pages the source is assumed to serve; the upstream reports no count.
const ESTIMATED_TOTAL_PAGES: u32 = 10;

/// Users the source is assumed to hold; the upstream reports no count.
const ESTIMATED_TOTAL_USERS: u64 = 1000;

/// Configuration for the randomuser source.
#[derive(Debug, Clone)]
pub struct RandomUserConfig {
    pub base_url: String,
    /// Fixed generation seed so repeated fetches return the same people.
    pub seed: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub rate_limit: RateLimitBudget,
    pub scarcity_threshold: f64,
}

impl Default for RandomUserConfig {
    fn default() -> Self {
        Self {
            base_url: "https://randomuser.me/api".to_string(),
            seed: "fanout".to_string(),
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(3),
            rate_limit: RateLimitBudget::new(200, Duration::from_secs(3600), 200),
            scarcity_threshold: crate::domain::budget::DEFAULT_SCARCITY_THRESHOLD,
        }
    }
}

/// Client for the randomuser endpoint.
pub struct RandomUserClient {
    config: RandomUserConfig,
    transport: Arc<dyn Transport>,
    cache: Arc<dyn Cache>,
    clock: Arc<dyn Clock>,
}

impl RandomUserClient {
    pub fn new(
        config: RandomUserConfig,
        transport: Arc<dyn Transport>,
        cache: Arc<dyn Cache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            transport,
            cache,
            clock,
        }
    }

    fn fetch_upstream(&self, page: u32, per_page: u32) -> Result<Page<Value>, ApiError> {
        let request = TransportRequest::new(self.config.base_url.clone())
            .with_query("page", page.to_string())
            .with_query("results", per_page.to_string())
            .with_query("seed", self.config.seed.as_str())
            .with_timeout(self.config.timeout)
            .with_connect_timeout(self.config.connect_timeout);

        let body = require_success(self.transport.get(&request))?;
        let payload = decode_body(&body)?;

        let records = payload
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ApiError::DataFormat("missing or invalid results array".to_string())
            })?
            .clone();

        // The upstream reports only the page size; estimate the rest.
        let reported = payload
            .pointer("/info/results")
            .and_then(Value::as_u64)
            .unwrap_or(records.len() as u64);
        let total = reported * u64::from(ESTIMATED_TOTAL_PAGES);

        Ok(Page::new(records, page, per_page, total, ESTIMATED_TOTAL_PAGES))
    }
}

impl SourceClient for RandomUserClient {
    fn source_id(&self) -> &str {
        "randomuser"
    }

    fn fetch_page(&self, page: u32, per_page: u32) -> Result<Page<Value>, ApiError> {
        let page = clamp_index(page);
        let per_page = clamp_index(per_page);
        // No configured override here: the rate period is the base lifetime.
        let lifetime = self.config.rate_limit.cache_lifetime(
            self.config.rate_limit.period(),
            self.config.scarcity_threshold,
        );
        fetch_with_cache(
            self.source_id(),
            &*self.cache,
            &*self.clock,
            lifetime,
            page,
            per_page,
            || self.fetch_upstream(page, per_page),
        )
    }

    fn total_pages(&self, _per_page: u32) -> Result<u32, ApiError> {
        Ok(ESTIMATED_TOTAL_PAGES)
    }

    fn total_users(&self) -> Result<u64, ApiError> {
        Ok(ESTIMATED_TOTAL_USERS)
    }

    fn rate_limit(&self) -> RateLimitBudget {
        self.config.rate_limit
    }
}

/// Adapter for randomuser records.
///
/// The upstream has no numeric ids, so one is synthesized as a 32-bit
/// checksum of the stable per-record login uuid. The same record therefore
/// always converts to the same id.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUserAdapter;

impl RandomUserAdapter {
    pub fn new() -> Self {
        Self
    }

    fn synthesized_id(stable: &str) -> i64 {
        let mut hasher = AHasher::default();
        stable.hash(&mut hasher);
        (hasher.finish() & 0xFFFF_FFFF) as i64
    }
}

impl UserAdapter for RandomUserAdapter {
    fn convert_to_user(&self, raw: &Value) -> User {
        User::new(
            Self::synthesized_id(&str_at(raw, &["login", "uuid"])),
            str_at(raw, &["email"]),
            str_at(raw, &["name", "first"]),
            str_at(raw, &["name", "last"]),
            str_at(raw, &["picture", "medium"]),
        )
    }
}
