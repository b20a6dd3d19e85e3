//! Ordered call chains.

mod support;

use std::sync::Arc;

use dfcontacts_core::testing::ScriptedTransport;
use dfcontacts_core::ContactsService;
use dfcontacts_domain::{CallResult, FailureKind, LogicalCall, TransportError};
use serde_json::json;
use support::{config, signed_in_client};

#[tokio::test]
async fn chain_returns_last_success() {
    let transport = Arc::new(ScriptedTransport::new());
    let client = signed_in_client(&transport, config()).await;
    transport.push_json(200, json!({"step": 1}));
    transport.push_json(200, json!({"step": 2}));

    let result = client.call_chain(&[LogicalCall::get("/one"), LogicalCall::get("/two")]).await;

    assert_eq!(result, CallResult::success(Some(json!({"step": 2}))));
    let urls: Vec<String> = transport.requests().into_iter().skip(1).map(|r| r.url).collect();
    assert!(urls[0].ends_with("/one"));
    assert!(urls[1].ends_with("/two"));
}

#[tokio::test]
async fn transport_failure_aborts_chain() {
    let transport = Arc::new(ScriptedTransport::new());
    let client = signed_in_client(&transport, config()).await;
    transport.push(Err(TransportError::Connect("refused".into())));

    let result = client
        .call_chain(&[LogicalCall::get("/one"), LogicalCall::get("/two"), LogicalCall::get("/three")])
        .await;

    assert_eq!(result.failure().unwrap().kind, FailureKind::Transport);
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn last_step_failure_is_the_chain_result() {
    let transport = Arc::new(ScriptedTransport::new());
    let client = signed_in_client(&transport, config()).await;
    transport.push_json(200, json!({}));
    transport.push_json(200, json!({}));
    transport.push_json(409, json!({"error": {"message": "Conflict"}}));

    let result = client
        .call_chain(&[LogicalCall::get("/one"), LogicalCall::get("/two"), LogicalCall::get("/three")])
        .await;

    let failure = result.failure().expect("third step fails");
    assert_eq!(failure.status_code, Some(409));
    assert_eq!(failure.user_message(), "Conflict");
    // sign-in, then the two steps that preceded the failing one
    assert_eq!(transport.request_count(), 1 + 2 + 1);
}

#[tokio::test]
async fn chain_step_recovers_from_expiry_before_continuing() {
    let transport = Arc::new(ScriptedTransport::new());
    let client = signed_in_client(&transport, config()).await;
    transport.push_json(200, json!({}));
    transport.push_json(401, json!({}));
    transport.push_json(200, json!({"session_token": "T2"}));
    transport.push_json(200, json!({}));
    transport.push_json(200, json!({"done": true}));

    let result = client
        .call_chain(&[LogicalCall::delete("/a"), LogicalCall::delete("/b"), LogicalCall::delete("/c")])
        .await;

    assert_eq!(result.body(), Some(&json!({"done": true})));
    assert_eq!(transport.request_count(), 6);
}

#[tokio::test]
async fn removing_contact_runs_three_ordered_deletes() {
    let transport = Arc::new(ScriptedTransport::new());
    let client = Arc::new(signed_in_client(&transport, config()).await);
    for _ in 0..3 {
        transport.push_json(200, json!({"resource": []}));
    }

    ContactsService::new(client).remove_contact(3).await.unwrap();

    let urls: Vec<String> = transport.requests().into_iter().skip(1).map(|r| r.url).collect();
    assert_eq!(
        urls,
        [
            "https://df.example.com/api/v2/db/_table/contact_group_relationship?filter=contact_id%3D3",
            "https://df.example.com/api/v2/db/_table/contact_info?filter=contact_id%3D3",
            "https://df.example.com/api/v2/db/_table/contact?id_field=id",
        ]
    );
}
