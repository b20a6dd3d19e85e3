//! Request building
//!
//! Turns a [`LogicalCall`] plus the current session token into a concrete
//! [`HttpRequest`]. Pure apart from the token it is handed; the base URL
//! was validated when the client was constructed, so this never fails.

use dfcontacts_domain::constants::{
    CONTENT_TYPE_JSON, HEADER_API_KEY, HEADER_CONTENT_LENGTH, HEADER_CONTENT_TYPE,
    HEADER_SESSION_TOKEN,
};
use dfcontacts_domain::{ClientConfig, HttpRequest, LogicalCall};

/// Build an authenticated request for `call`
///
/// The session-token header is attached only when `token` is present.
/// `Content-Length` and the body are set only when the call has a body.
pub fn build_request(config: &ClientConfig, call: &LogicalCall, token: Option<&str>) -> HttpRequest {
    let mut url = format!("{}{}", config.trimmed_base_url(), call.relative_path());
    if !call.query_params().is_empty() {
        url.push('?');
        url.push_str(&encode_query(call.query_params()));
    }

    let mut headers = vec![
        (HEADER_CONTENT_TYPE.to_string(), CONTENT_TYPE_JSON.to_string()),
        (HEADER_API_KEY.to_string(), config.api_key.clone()),
    ];
    if let Some(token) = token {
        headers.push((HEADER_SESSION_TOKEN.to_string(), token.to_string()));
    }

    let body = call.body().map(|value| value.to_string().into_bytes());
    if let Some(bytes) = &body {
        headers.push((HEADER_CONTENT_LENGTH.to_string(), bytes.len().to_string()));
    }

    HttpRequest { method: call.method(), url, headers, body, timeout: config.timeout }
}

/// `k1=v1&k2=v2` in the given order, keys and values percent-encoded
///
/// Only RFC 3986 unreserved characters (alphanumerics and `-._~`) pass
/// through unescaped.
pub fn encode_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
