//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the
//! application layer needs. Infrastructure adapters implement these ports:
//! the system clock, an HTTP transport, and a cache store with absolute
//! expiry.

use std::fmt;
use std::time::{Duration, Instant};

/// Port for obtaining current time.
///
/// This abstraction allows the application layer to work with time without
/// depending on system clock implementation details. Infrastructure provides
/// concrete implementations (SystemClock, MockClock).
pub trait Clock: Send + Sync + fmt::Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// A single outbound GET request.
///
/// Carries everything a source needs to vary per call: query parameters,
/// headers, and both timeout knobs.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    url: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    timeout: Duration,
    connect_timeout: Duration,
}

impl TransportRequest {
    /// Create a request with default timeouts (30s total, 10s connect).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the total request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection-establishment timeout.
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

/// Raw response from the transport: status code plus body text.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure below the HTTP layer: unreachable host, timeout, TLS, etc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(String);

impl TransportError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error: {}", self.0)
    }
}

impl std::error::Error for TransportError {}

/// Port for the outbound HTTP capability.
///
/// The application layer only ever issues GET requests; everything else
/// about the HTTP stack (connection pooling, TLS, proxies) lives behind
/// this trait in infrastructure.
pub trait Transport: Send + Sync {
    /// Execute the request and return the raw response.
    fn get(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// Port for the cache store.
///
/// Entries expire at an absolute instant; an expired entry is
/// indistinguishable from an absent one. The application layer computes
/// keys and lifetimes, the store owns the entries.
pub trait Cache: Send + Sync {
    /// Fetch a non-expired entry, or `None` when missing or expired.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value until `expires_at`.
    fn set(&self, key: &str, value: String, expires_at: Instant);
}
