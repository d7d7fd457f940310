// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod agent;
pub mod api;
pub mod article;
pub mod chat;
pub mod citations;
pub mod config;
pub mod feeds;
pub mod metrics;
pub mod search;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::article::{Article, Source};
pub use crate::chat::{ChatController, ChatSink, TurnPhase};
pub use crate::citations::render_citations;
