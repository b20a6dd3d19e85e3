use std::time::Duration;

use async_trait::async_trait;
use dfcontacts_core::HttpTransport;
use dfcontacts_domain::constants::HEADER_CONTENT_LENGTH;
use dfcontacts_domain::{ClientConfig, DfError, HttpMethod, HttpRequest, HttpResponse, TransportError};
use reqwest::{Client as ReqwestClient, Method};
use tracing::debug;

use crate::errors::{into_transport_error, InfraError};

/// [`HttpTransport`] over a shared reqwest connection pool.
///
/// Performs exactly one exchange per [`send`](HttpTransport::send) with no
/// retries. The per-request timeout comes from the [`HttpRequest`].
#[derive(Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    /// Start building a new transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Transport configured from the client settings (timeout, user agent).
    pub fn from_config(config: &ClientConfig) -> Result<Self, DfError> {
        let mut builder = Self::builder().connect_timeout(config.timeout);
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder.build()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let timeout = request.timeout;
        let mut builder = self.client.request(to_method(request.method), &request.url).timeout(timeout);

        for (name, value) in &request.headers {
            // reqwest derives Content-Length from the body itself
            if name.eq_ignore_ascii_case(HEADER_CONTENT_LENGTH) {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response =
            builder.send().await.map_err(|err| into_transport_error(err, timeout))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body =
            response.bytes().await.map_err(|err| into_transport_error(err, timeout))?.to_vec();

        debug!(status, bytes = body.len(), url = %request.url, "received HTTP response");
        Ok(HttpResponse { status, headers, body })
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug)]
pub struct ReqwestTransportBuilder {
    connect_timeout: Duration,
    user_agent: Option<String>,
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

impl ReqwestTransportBuilder {
    /// Upper bound for establishing a connection. The overall per-request
    /// timeout is carried by each [`HttpRequest`].
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<ReqwestTransport, DfError> {
        let mut builder = ReqwestClient::builder().connect_timeout(self.connect_timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            DfError::from(infra)
        })?;

        Ok(ReqwestTransport { client })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn transport() -> ReqwestTransport {
        ReqwestTransport::builder().user_agent("dfcontacts-tests").build().expect("transport")
    }

    fn request(method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest {
            method,
            url,
            headers: vec![
                ("Content-Type".into(), "application/json".into()),
                ("X-DreamFactory-Api-Key".into(), "key-1".into()),
            ],
            body: None,
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn forwards_method_headers_query_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/db/_table/contact"))
            .and(query_param("id_field", "id"))
            .and(header("X-DreamFactory-Api-Key", "key-1"))
            .and(header("user-agent", "dfcontacts-tests"))
            .and(body_json(json!({"resource": [{"first_name": "Ada"}]})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"resource": [{"id": 1}]})))
            .expect(1)
            .mount(&server)
            .await;

        let mut req = request(
            HttpMethod::Post,
            format!("{}/api/v2/db/_table/contact?id_field=id", server.uri()),
        );
        let body = json!({"resource": [{"first_name": "Ada"}]}).to_string().into_bytes();
        req.headers.push(("Content-Length".into(), body.len().to_string()));
        req.body = Some(body);

        let response = transport().send(req).await.expect("response");
        assert_eq!(response.status, 201);
        let parsed: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(parsed["resource"][0]["id"], 1);
    }

    #[tokio::test]
    async fn error_statuses_are_successful_exchanges() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401)
                    .insert_header("x-request-id", "abc")
                    .set_body_string("{\"error\":{\"message\":\"expired\"}}"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = transport().send(request(HttpMethod::Get, server.uri())).await.unwrap();
        assert_eq!(response.status, 401);
        assert_eq!(response.header("X-Request-Id"), Some("abc"));
    }

    #[tokio::test]
    async fn does_not_retry_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let response = transport().send(request(HttpMethod::Delete, server.uri())).await.unwrap();
        assert_eq!(response.status, 503);
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn honours_request_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let mut req = request(HttpMethod::Get, server.uri());
        req.timeout = Duration::from_millis(50);
        let err = transport().send(req).await.unwrap_err();
        assert_eq!(err, TransportError::Timeout(Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn refused_connection_is_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = transport().send(request(HttpMethod::Get, format!("http://{addr}"))).await.unwrap_err();
        assert!(matches!(err, TransportError::Connect(_)), "got {err:?}");
    }
}
