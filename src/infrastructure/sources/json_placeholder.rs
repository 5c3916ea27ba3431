//! The jsonplaceholder source: no native pagination.
//!
//! The upstream returns its entire user collection as a bare JSON array,
//! so the client paginates locally. Records carry a combined `name` and no
//! avatar; the adapter maps the name into `first_name` and fills in a
//! placeholder image.

use crate::application::adapter::UserAdapter;
use crate::application::client::{
    decode_body, fetch_with_cache, require_success, SourceClient,
};
use crate::application::ports::{Cache, Clock, Transport, TransportRequest};
use crate::domain::budget::RateLimitBudget;
use crate::domain::error::ApiError;
use crate::domain::page::{clamp_index, page_count, paginate, Page};
use crate::domain::user::User;
use crate::infrastructure::sources::{id_at, str_at};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Avatar assigned to every record; the upstream provides none.
const PLACEHOLDER_AVATAR: &str = "https://via.placeholder.com/150";

/// Configuration for the jsonplaceholder source.
#[derive(Debug, Clone)]
pub struct JsonPlaceholderConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub rate_limit: RateLimitBudget,
    pub scarcity_threshold: f64,
    pub per_page: u32,
}

impl Default for JsonPlaceholderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://jsonplaceholder.typicode.com".to_string(),
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(3),
            rate_limit: RateLimitBudget::new(100, Duration::from_secs(3600), 100),
            scarcity_threshold: 0.3,
            per_page: 6,
        }
    }
}

/// Client for the jsonplaceholder users endpoint.
pub struct JsonPlaceholderClient {
    config: JsonPlaceholderConfig,
    transport: Arc<dyn Transport>,
    cache: Arc<dyn Cache>,
    clock: Arc<dyn Clock>,
}

impl JsonPlaceholderClient {
    pub fn new(
        config: JsonPlaceholderConfig,
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
            .with_timeout(self.config.timeout)
            .with_connect_timeout(self.config.connect_timeout);

        let body = require_success(self.transport.get(&request))?;
        let payload = decode_body(&body)?;

        let all_users = match payload {
            Value::Array(users) => users,
            _ => {
                return Err(ApiError::DataFormat(
                    "expected array of users".to_string(),
                ))
            }
        };

        let total = all_users.len() as u64;
        let total_pages = page_count(total, per_page);
        let records = paginate(all_users, page, per_page);

        Ok(Page::new(records, page, per_page, total, total_pages))
    }
}

impl SourceClient for JsonPlaceholderClient {
    fn source_id(&self) -> &str {
        "jsonplaceholder"
    }

    fn fetch_page(&self, page: u32, per_page: u32) -> Result<Page<Value>, ApiError> {
        let page = clamp_index(page);
        let per_page = clamp_index(per_page);
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

    fn total_pages(&self, per_page: u32) -> Result<u32, ApiError> {
        self.fetch_page(1, per_page).map(|page| page.total_pages())
    }

    fn total_users(&self) -> Result<u64, ApiError> {
        self.fetch_page(1, self.config.per_page)
            .map(|page| page.total())
    }

    fn rate_limit(&self) -> RateLimitBudget {
        self.config.rate_limit
    }
}

/// Adapter for jsonplaceholder records.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPlaceholderAdapter;

impl JsonPlaceholderAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl UserAdapter for JsonPlaceholderAdapter {
    fn convert_to_user(&self, raw: &Value) -> User {
        User::new(
            id_at(raw, "id"),
            str_at(raw, &["email"]),
            // The upstream has one combined name field.
            str_at(raw, &["name"]),
            "",
            PLACEHOLDER_AVATAR,
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

    fn collection_body() -> String {
        json!([
            {"id": 1, "name": "Leanne Graham", "email": "leanne@example.com"},
            {"id": 2, "name": "Ervin Howell", "email": "ervin@example.com"},
            {"id": 3, "name": "Clementine Bauch", "email": "clementine@example.com"},
            {"id": 4, "name": "Patricia Lebsack", "email": "patricia@example.com"},
            {"id": 5, "name": "Chelsey Dietrich", "email": "chelsey@example.com"}
        ])
        .to_string()
    }

    fn client(transport: Arc<MockTransport>) -> JsonPlaceholderClient {
        let clock = Arc::new(MockClock::new(Instant::now()));
        JsonPlaceholderClient::new(
            JsonPlaceholderConfig::default(),
            transport,
            Arc::new(MemoryCache::new(clock.clone())),
            clock,
        )
    }

    #[test]
    fn test_fetch_page_paginates_locally() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_body(collection_body());
        let client = client(transport);

        let page = client.fetch_page(2, 2).unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.records()[0]["id"], 3);
        assert_eq!(page.records()[1]["id"], 4);
        assert_eq!(page.total(), 5);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_page_past_the_end_is_empty_but_keeps_totals() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_body(collection_body());
        let client = client(transport);

        let page = client.fetch_page(9, 2).unwrap();

        assert!(page.is_empty());
        assert_eq!(page.total(), 5);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_zero_per_page_is_clamped() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_body(collection_body());
        let client = client(transport);

        let page = client.fetch_page(1, 0).unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page.per_page(), 1);
        assert_eq!(page.total_pages(), 5);
    }

    #[test]
    fn test_pages_are_cached_independently() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_body(collection_body());
        transport.enqueue_body(collection_body());
        let client = client(transport.clone());

        client.fetch_page(1, 2).unwrap();
        client.fetch_page(2, 2).unwrap();
        client.fetch_page(1, 2).unwrap();

        // Two distinct keys fetched once each; the repeat was a cache hit.
        assert_eq!(transport.call_count(), 2);
    }

    #[test]
    fn test_non_array_body_is_a_format_error() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_body(json!({"users": []}).to_string());
        let client = client(transport);

        assert!(matches!(
            client.fetch_page(1, 2),
            Err(ApiError::DataFormat(_))
        ));
    }

    #[test]
    fn test_total_users_counts_the_collection() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_body(collection_body());
        let client = client(transport);

        assert_eq!(client.total_users().unwrap(), 5);
    }

    #[test]
    fn test_adapter_maps_combined_name_and_placeholder_avatar() {
        let raw = json!({"id": 3, "name": "Clementine Bauch", "email": "c@e.x"});

        let user = JsonPlaceholderAdapter::new().convert_to_user(&raw);

        assert_eq!(user.id(), 3);
        assert_eq!(user.first_name(), "Clementine Bauch");
        assert_eq!(user.last_name(), "");
        assert_eq!(user.avatar_url(), PLACEHOLDER_AVATAR);
    }
}
