//! Shared fixtures for `dfcontacts-core` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use dfcontacts_core::testing::ScriptedTransport;
use dfcontacts_core::RestClient;
use dfcontacts_domain::{ClientConfig, HttpRequest, HttpResponse};
use serde_json::json;

pub const EMAIL: &str = "user1@example.com";
pub const PASSWORD: &str = "password";

pub fn config() -> ClientConfig {
    ClientConfig::new("https://df.example.com/api/v2", "test-api-key")
}

/// Client already signed in with token `T1`
pub async fn signed_in_client(transport: &Arc<ScriptedTransport>, config: ClientConfig) -> RestClient {
    transport.push_json(200, json!({"session_token": "T1", "email": EMAIL}));
    let client = RestClient::new(config, transport.clone()).expect("valid config");
    client.sign_in_with_email(EMAIL, PASSWORD).await.expect("sign-in succeeds");
    client
}

/// Sign-in always succeeds with a fresh token; every other path is 401
pub fn always_expired(transport: &ScriptedTransport) {
    transport.respond_with(|request| {
        if is_sign_in(request) {
            Ok(HttpResponse::json(200, &json!({"session_token": "fresh", "email": EMAIL})))
        } else {
            Ok(HttpResponse::json(401, &json!({"error": {"message": "Token expired"}})))
        }
    });
}

pub fn is_sign_in(request: &HttpRequest) -> bool {
    request.url.ends_with("/user/session")
}

pub fn count_matching(transport: &ScriptedTransport, suffix: &str) -> usize {
    transport.requests().iter().filter(|request| request.url.ends_with(suffix)).count()
}
