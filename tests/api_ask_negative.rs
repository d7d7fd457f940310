// tests/api_ask_negative.rs
//
// Failure-path contract for POST /api/ask: bad input is 400, wrong method is
// 405, a misconfigured server is 500 with a configuration message and no
// outbound call, and upstream failures surface as 500 with the agent's error.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value as Json};
use shuttle_axum::axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt as _;

use mbb_insights::agent::AgentClient;
use mbb_insights::api::{self, AppState};
use mbb_insights::feeds::types::FeedProvider;

/// Counts calls so tests can assert "no outbound call attempted".
struct CountingAgent {
    calls: Arc<AtomicUsize>,
    fail_with: Option<&'static str>,
}

#[async_trait]
impl AgentClient for CountingAgent {
    async fn ask(&self, _message: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_with {
            Some(msg) => anyhow::bail!("{msg}"),
            None => Ok("ok".to_string()),
        }
    }
    fn name(&self) -> &'static str {
        "counting"
    }
}

fn router_with(agent: Option<Arc<dyn AgentClient>>) -> Router {
    api::router(AppState {
        agent,
        sessions: None,
        feeds: Arc::new(Vec::<Box<dyn FeedProvider>>::new()),
    })
}

fn ask_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/ask")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build POST /api/ask")
}

async fn json_body(resp: shuttle_axum::axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_message_is_400() {
    let app = router_with(None);
    let resp = app.oneshot(ask_request("{}")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v = json_body(resp).await;
    assert_eq!(v["error"], "message (string) required");
}

#[tokio::test]
async fn wrong_typed_message_is_400() {
    let app = router_with(None);
    let resp = app
        .oneshot(ask_request(r#"{"message": 42}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_message_is_400() {
    let app = router_with(None);
    let resp = app
        .oneshot(ask_request(r#"{"message": "   "}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = router_with(None);
    let resp = app.oneshot(ask_request("not json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_is_405() {
    let app = router_with(None);
    let req = Request::builder()
        .method("GET")
        .uri("/api/ask")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unconfigured_server_is_500_with_config_message_and_no_call() {
    // A configured agent that must NOT be reached stands in for "no outbound
    // call attempted": here the state has no agent at all, so the handler has
    // nothing to call and must answer from configuration alone.
    let app = router_with(None);
    let resp = app
        .oneshot(ask_request(r#"{"message": "test"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let v = json_body(resp).await;
    let msg = v["error"].as_str().unwrap();
    assert!(
        msg.contains("OPENAI_API_KEY"),
        "error should name the missing credential, got: {msg}"
    );
}

#[tokio::test]
async fn upstream_failure_is_500_with_agent_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let agent: Arc<dyn AgentClient> = Arc::new(CountingAgent {
        calls: calls.clone(),
        fail_with: Some("agent returned 503 Service Unavailable: overloaded"),
    });
    let app = router_with(Some(agent));

    let resp = app
        .oneshot(ask_request(r#"{"message": "test"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let v = json_body(resp).await;
    assert!(v["error"].as_str().unwrap().contains("overloaded"));
}

#[tokio::test]
async fn bad_input_never_reaches_the_agent() {
    let calls = Arc::new(AtomicUsize::new(0));
    let agent: Arc<dyn AgentClient> = Arc::new(CountingAgent {
        calls: calls.clone(),
        fail_with: None,
    });
    let app = router_with(Some(agent));

    let resp = app.oneshot(ask_request("{}")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
