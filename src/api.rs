// src/api.rs
use std::sync::Arc;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde_json::{json, Value};
use shuttle_axum::axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::agent::{AgentClient, SessionIssuer};
use crate::article::Article;
use crate::config::AgentSettings;
use crate::feeds::types::FeedProvider;
use crate::feeds::{self, config::FeedEndpoint, providers::json_feed::JsonFeedProvider};
use crate::search;

#[derive(Clone)]
pub struct AppState {
    /// None when OPENAI_API_KEY / VS_ID are not configured; /api/ask then
    /// answers 500 without attempting an outbound call.
    pub agent: Option<Arc<dyn AgentClient>>,
    /// None when OPENAI_API_KEY / AGENT_ID are not configured.
    pub sessions: Option<Arc<SessionIssuer>>,
    pub feeds: Arc<Vec<Box<dyn FeedProvider>>>,
}

impl AppState {
    pub fn from_env() -> Self {
        let settings = AgentSettings::from_env();
        let agent = settings
            .research_agent()
            .map(|a| Arc::new(a) as Arc<dyn AgentClient>);
        let sessions = settings.session_issuer().map(Arc::new);

        let endpoints = feeds::config::load_endpoints_default().unwrap_or_else(|e| {
            warn!(error = ?e, "feed config unusable, using built-in defaults");
            feeds::config::default_endpoints()
        });
        Self {
            agent,
            sessions,
            feeds: Arc::new(providers_for(endpoints)),
        }
    }
}

fn providers_for(endpoints: Vec<FeedEndpoint>) -> Vec<Box<dyn FeedProvider>> {
    endpoints
        .into_iter()
        .map(|ep| Box::new(JsonFeedProvider::from_url(ep.source, ep.url)) as Box<dyn FeedProvider>)
        .collect()
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ask_requests_total", "Questions received on /api/ask.");
        describe_counter!("ask_failures_total", "Failed /api/ask turns.");
    });
}

/// Build the Router from environment configuration (the binary's path).
pub fn create_router() -> Router {
    router(AppState::from_env())
}

/// Build the Router around an explicit state (the tests' path).
pub fn router(state: AppState) -> Router {
    ensure_metrics_described();
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/ask", post(ask))
        .route("/api/chatkit/session", post(chatkit_session))
        .route("/api/news", get(news))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct AskReq {
    message: String,
}

fn error_json(status: StatusCode, msg: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": msg })))
}

/// Anonymous id for log lines: first 6 bytes of a SHA-256, hex-encoded.
/// User questions are never logged raw.
fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskReq>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    counter!("ask_requests_total").increment(1);

    let Ok(Json(req)) = payload else {
        return error_json(StatusCode::BAD_REQUEST, "message (string) required");
    };
    let message = req.message.trim();
    if message.is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "message (string) required");
    }

    // Configuration error: static message, no outbound call.
    let Some(agent) = &state.agent else {
        counter!("ask_failures_total").increment(1);
        return error_json(
            StatusCode::INTERNAL_SERVER_ERROR,
            "missing OPENAI_API_KEY or VS_ID",
        );
    };

    info!(id = %anon_hash(message), chars = message.chars().count(), "question received");

    match agent.ask(message).await {
        Ok(answer) => (StatusCode::OK, Json(json!({ "answer": answer }))),
        Err(e) => {
            error!(error = ?e, "agent call failed");
            counter!("ask_failures_total").increment(1);
            error_json(StatusCode::INTERNAL_SERVER_ERROR, &format!("{e:#}"))
        }
    }
}

async fn chatkit_session(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let Some(sessions) = &state.sessions else {
        return error_json(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Missing OPENAI_API_KEY or AGENT_ID",
        );
    };

    match sessions.create().await {
        Ok(secret) => (StatusCode::OK, Json(json!({ "client_secret": secret }))),
        Err(e) => {
            error!(error = ?e, "chatkit session failed");
            error_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create session",
            )
        }
    }
}

#[derive(serde::Deserialize)]
struct NewsQuery {
    #[serde(default)]
    q: String,
}

async fn news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Json<Vec<Article>> {
    let articles = feeds::aggregate_once(&state.feeds).await;
    Json(search::filter_articles(&articles, &query.q))
}
