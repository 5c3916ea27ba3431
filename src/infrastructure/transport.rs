//! Blocking HTTP transport adapter.
//!
//! Builds a fresh `reqwest` client per request so that each source's
//! timeout and connect-timeout settings apply exactly as configured, the
//! way the upstream configuration intends them per call.

use crate::application::ports::{Transport, TransportError, TransportRequest, TransportResponse};

/// HTTP transport over blocking `reqwest`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransport;

impl HttpTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for HttpTransport {
    fn get(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(request.timeout())
            .connect_timeout(request.connect_timeout())
            .build()
            .map_err(|err| TransportError::new(err.to_string()))?;

        let mut builder = client.get(request.url()).query(request.query());
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .map_err(|err| TransportError::new(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| TransportError::new(err.to_string()))?;

        Ok(TransportResponse::new(status, body))
    }
}
