//! Mock transport for testing.

use crate::application::ports::{Transport, TransportError, TransportRequest, TransportResponse};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock transport serving a queue of canned outcomes.
///
/// Each `get` pops the next queued outcome and records the request, so
/// tests can assert both what was sent and how many upstream calls
/// actually happened (the cache-idempotence property).
///
/// An exhausted queue returns a transport error, which makes an unexpected
/// extra upstream call fail the test loudly instead of hanging it.
#[derive(Debug, Default)]
pub struct MockTransport {
    outcomes: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    requests: Mutex<Vec<TransportRequest>>,
    calls: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 response with the given body.
    pub fn enqueue_body(&self, body: impl Into<String>) {
        self.enqueue_response(TransportResponse::new(200, body));
    }

    /// Queue a response with an explicit status code.
    pub fn enqueue_status(&self, status: u16, body: impl Into<String>) {
        self.enqueue_response(TransportResponse::new(status, body));
    }

    /// Queue a full response.
    pub fn enqueue_response(&self, response: TransportResponse) {
        self.outcomes
            .lock()
            .expect("MockTransport mutex poisoned")
            .push_back(Ok(response));
    }

    /// Queue a transport-level failure.
    pub fn enqueue_error(&self, detail: impl Into<String>) {
        self.outcomes
            .lock()
            .expect("MockTransport mutex poisoned")
            .push_back(Err(TransportError::new(detail)));
    }

    /// Number of `get` calls observed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Copies of every request observed so far, in order.
    pub fn recorded_requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .expect("MockTransport mutex poisoned")
            .clone()
    }
}

impl Transport for MockTransport {
    fn get(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("MockTransport mutex poisoned")
            .push(request.clone());
        self.outcomes
            .lock()
            .expect("MockTransport mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("mock transport queue exhausted")))
    }
}
