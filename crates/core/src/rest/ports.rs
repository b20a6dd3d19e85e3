//! Port interfaces for HTTP exchanges

use async_trait::async_trait;
use dfcontacts_domain::{HttpRequest, HttpResponse, TransportError};

/// Performs a single network exchange
///
/// Implementations must not retry on their own and must honour
/// [`HttpRequest::timeout`]. Any status code, including 4xx/5xx, is a
/// successful exchange from the transport's point of view.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
