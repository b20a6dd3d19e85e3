//! Test doubles for the HTTP transport port
//!
//! Available to this crate's tests and, behind the `test-utils` feature, to
//! downstream crates.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dfcontacts_domain::{HttpRequest, HttpResponse, TransportError};
use parking_lot::Mutex;
use serde_json::Value;

use crate::rest::ports::HttpTransport;

type Outcome = Result<HttpResponse, TransportError>;
type Responder = Arc<dyn Fn(&HttpRequest) -> Outcome + Send + Sync>;

/// Transport that replays scripted outcomes and records every request
///
/// Queued outcomes are consumed first, in order. Once the queue is empty the
/// responder installed with [`respond_with`](Self::respond_with) answers;
/// without one, the request fails with [`TransportError::Request`].
#[derive(Default)]
pub struct ScriptedTransport {
    queue: Mutex<VecDeque<Outcome>>,
    responder: Mutex<Option<Responder>>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, outcome: Outcome) {
        self.queue.lock().push_back(outcome);
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.push(Ok(HttpResponse::json(status, &body)));
    }

    pub fn respond_with<F>(&self, responder: F)
    where
        F: Fn(&HttpRequest) -> Outcome + Send + Sync + 'static,
    {
        *self.responder.lock() = Some(Arc::new(responder));
    }

    /// Sleep this long before answering each request
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request.clone());

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self.queue.lock().pop_front();
        if let Some(outcome) = queued {
            return outcome;
        }
        let responder = self.responder.lock().clone();
        match responder {
            Some(responder) => responder(&request),
            None => Err(TransportError::Request(format!("no scripted response for {}", request.url))),
        }
    }
}
