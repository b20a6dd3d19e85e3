//! Shared helpers for infra integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use dfcontacts_core::RestClient;
use dfcontacts_domain::ClientConfig;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_PREFIX: &str = "/api/v2";
pub const API_KEY: &str = "integration-key";
pub const EMAIL: &str = "user1@example.com";
pub const PASSWORD: &str = "password";

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(format!("{}{API_PREFIX}", server.uri()), API_KEY)
}

pub fn client_for(server: &MockServer) -> Arc<RestClient> {
    dfcontacts_infra::connect(config_for(server)).expect("client should build")
}

pub fn sign_in_body() -> Value {
    json!({"email": EMAIL, "password": PASSWORD})
}

/// Answer every sign-in with `token`
pub async fn mount_sign_in(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(format!("{API_PREFIX}/user/session")))
        .and(body_json(sign_in_body()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"session_token": token, "email": EMAIL})),
        )
        .mount(server)
        .await;
}
