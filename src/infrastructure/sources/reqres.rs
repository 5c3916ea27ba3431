//! The reqres source: natively paginated, keyed by an API header.
//!
//! Response shape: `{"page", "per_page", "total", "total_pages", "data":
//! [{"id", "email", "first_name", "last_name", "avatar"}, ...]}`.

use crate::application::adapter::UserAdapter;
use crate::application::client::{
    decode_body, fetch_with_cache, require_success, SourceClient,
};
use crate::application::ports::{Cache, Clock, Transport, TransportRequest};
use crate::domain::budget::RateLimitBudget;
use crate::domain::error::ApiError;
use crate::domain::page::{clamp_index, Page};
use crate::domain::user::User;
use crate::infrastructure::sources::{id_at, str_at};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the reqres source.
#[derive(Debug, Clone)]
pub struct ReqresConfig {
    pub base_url: String,
    /// Sent as the `x-api-key` header on every request.
    pub api_key: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub rate_limit: RateLimitBudget,
    /// Base cache lifetime; doubled when quota runs scarce.
    pub cache_duration: Duration,
    pub scarcity_threshold: f64,
}

impl Default for ReqresConfig {
    fn default() -> Self {
        Self {
            base_url: "https://reqres.in/api".to_string(),
            api_key: "reqres-free-v1".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            rate_limit: RateLimitBudget::new(60, Duration::from_secs(3600), 60),
            cache_duration: Duration::from_secs(3600),
            scarcity_threshold: 0.2,
        }
    }
}

/// Client for the reqres users endpoint.
pub struct ReqresClient {
    config: ReqresConfig,
    transport: Arc<dyn Transport>,
    cache: Arc<dyn Cache>,
    clock: Arc<dyn Clock>,
}

impl ReqresClient {
    pub fn new(
        config: ReqresConfig,
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
        let request = TransportRequest::new(format!("{}/users", self.config.base_url))
            .with_query("page", page.to_string())
            .with_query("per_page", per_page.to_string())
            .with_header("x-api-key", self.config.api_key.as_str())
            .with_timeout(self.config.timeout)
            .with_connect_timeout(self.config.connect_timeout);

        let body = require_success(self.transport.get(&request))?;
        let payload = decode_body(&body)?;

        let records = payload
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ApiError::DataFormat("missing or invalid data array".to_string())
            })?
            .clone();

        Ok(Page::new(
            records,
            payload.get("page").and_then(Value::as_u64).unwrap_or(page.into()) as u32,
            payload
                .get("per_page")
                .and_then(Value::as_u64)
                .unwrap_or(per_page.into()) as u32,
            payload.get("total").and_then(Value::as_u64).unwrap_or(0),
            payload
                .get("total_pages")
                .and_then(Value::as_u64)
                .unwrap_or(0) as u32,
        ))
    }
}

impl SourceClient for ReqresClient {
    fn source_id(&self) -> &str {
        "reqres"
    }

    fn fetch_page(&self, page: u32, per_page: u32) -> Result<Page<Value>, ApiError> {
        let page = clamp_index(page);
        let per_page = clamp_index(per_page);
        let lifetime = self
            .config
            .rate_limit
            .cache_lifetime(self.config.cache_duration, self.config.scarcity_threshold);
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

    fn total_pages(&self, per_page: u32) -> Result<u32, ApiError> {
        self.fetch_page(1, per_page).map(|page| page.total_pages())
    }

    fn total_users(&self) -> Result<u64, ApiError> {
        // The smallest possible page still reports the full total.
        self.fetch_page(1, 1).map(|page| page.total())
    }

    fn rate_limit(&self) -> RateLimitBudget {
        self.config.rate_limit
    }
}

/// Adapter for reqres records: the canonical schema almost verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqresAdapter;

impl ReqresAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl UserAdapter for ReqresAdapter {
    fn convert_to_user(&self, raw: &Value) -> User {
        User::new(
            id_at(raw, "id"),
            str_at(raw, &["email"]),
            str_at(raw, &["first_name"]),
            str_at(raw, &["last_name"]),
            str_at(raw, &["avatar"]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::MemoryCache;
    use crate::infrastructure::mocks::{MockClock, MockTransport};
    use serde_json::json;
    use std::time::Instant;

    fn page_body() -> String {
        json!({
            "page": 1,
            "per_page": 2,
            "total": 12,
            "total_pages": 6,
            "data": [
                {"id": 1, "email": "george.bluth@reqres.in", "first_name": "George",
                 "last_name": "Bluth", "avatar": "https://reqres.in/img/faces/1-image.jpg"},
                {"id": 2, "email": "janet.weaver@reqres.in", "first_name": "Janet",
                 "last_name": "Weaver", "avatar": "https://reqres.in/img/faces/2-image.jpg"}
            ]
        })
        .to_string()
    }

    fn client(transport: Arc<MockTransport>) -> ReqresClient {
        let clock = Arc::new(MockClock::new(Instant::now()));
        ReqresClient::new(
            ReqresConfig::default(),
            transport,
            Arc::new(MemoryCache::new(clock.clone())),
            clock,
        )
    }

    #[test]
    fn test_fetch_page_parses_envelope() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_body(page_body());
        let client = client(transport.clone());

        let page = client.fetch_page(1, 2).unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.total(), 12);
        assert_eq!(page.total_pages(), 6);

        let request = &transport.recorded_requests()[0];
        assert!(request.url().ends_with("/users"));
        assert!(request
            .headers()
            .iter()
            .any(|(name, value)| name == "x-api-key" && value == "reqres-free-v1"));
    }

    #[test]
    fn test_second_fetch_is_served_from_cache() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_body(page_body());
        let client = client(transport.clone());

        let first = client.fetch_page(1, 2).unwrap();
        let second = client.fetch_page(1, 2).unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_missing_data_array_is_a_format_error() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_body(json!({"page": 1}).to_string());
        let client = client(transport);

        assert!(matches!(
            client.fetch_page(1, 2),
            Err(ApiError::DataFormat(_))
        ));
    }

    #[test]
    fn test_invalid_json_is_a_format_error() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_body("<html>oops</html>");
        let client = client(transport);

        assert!(matches!(
            client.fetch_page(1, 2),
            Err(ApiError::DataFormat(_))
        ));
    }

    #[test]
    fn test_transport_failure_is_a_connection_error() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_error("connection refused");
        let client = client(transport);

        assert!(matches!(
            client.fetch_page(1, 2),
            Err(ApiError::Connection(_))
        ));
    }

    #[test]
    fn test_http_error_status_is_a_connection_error() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_status(503, "busy");
        let client = client(transport);

        assert!(matches!(
            client.fetch_page(1, 2),
            Err(ApiError::Connection(_))
        ));
    }

    #[test]
    fn test_totals_come_from_page_one() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_body(page_body());
        let client = client(transport);

        assert_eq!(client.total_pages(2).unwrap(), 6);
    }

    #[test]
    fn test_rate_limit_reflects_configuration() {
        let client = client(Arc::new(MockTransport::new()));

        let budget = client.rate_limit();
        assert_eq!(budget.limit(), 60);
        assert_eq!(budget.remaining(), 60);
    }

    #[test]
    fn test_adapter_maps_fields() {
        let raw = json!({
            "id": 7, "email": "m@e.x", "first_name": "Michael",
            "last_name": "Lawson", "avatar": "https://reqres.in/img/faces/7-image.jpg"
        });

        let user = ReqresAdapter::new().convert_to_user(&raw);

        assert_eq!(user.id(), 7);
        assert_eq!(user.email(), "m@e.x");
        assert_eq!(user.first_name(), "Michael");
        assert_eq!(user.last_name(), "Lawson");
        assert_eq!(user.avatar_url(), "https://reqres.in/img/faces/7-image.jpg");
    }

    #[test]
    fn test_adapter_defaults_missing_fields() {
        let user = ReqresAdapter::new().convert_to_user(&json!({}));

        assert_eq!(user.id(), 0);
        assert_eq!(user.email(), "");
        assert_eq!(user.first_name(), "");
    }
}
