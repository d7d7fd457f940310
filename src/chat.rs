// src/chat.rs
//! Per-turn chat state machine: `Idle -> Sending -> (Rendered | Errored) ->
//! Idle`. The controller owns all per-turn state, including the thinking
//! ticker handle, so there is no process-wide timer to leak.
//!
//! The thinking ticker is purely cosmetic. It cycles a fixed hint sequence on
//! a timer and says nothing about real backend progress; it is aborted on
//! every exit path from `Sending` before the turn's outcome is delivered.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::agent::AgentClient;
use crate::citations::render_citations;

/// Hints cycled while a request is in flight; the sequence clamps at the last
/// entry.
pub const THINKING_HINTS: [&str; 4] = [
    "Reading the question…",
    "Searching related documents…",
    "Collecting key figures and citations…",
    "Assembling footnotes…",
];

const DEFAULT_HINT_PERIOD: Duration = Duration::from_millis(900);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Sending,
    Rendered,
    Errored,
}

/// What the UI shell implements: the controller pushes bubbles and hint
/// updates through this, never touching the DOM-equivalent itself.
pub trait ChatSink: Send + Sync {
    fn user_message(&self, text: &str);
    fn agent_html(&self, html: &str);
    fn error(&self, message: &str);
    fn thinking_hint(&self, hint: &str);
}

/// Drives one request/response turn at a time. Turns are serialized by
/// `&mut self`; there is no concurrent-turn support, matching the UI which
/// disables its send control while `Sending`.
pub struct ChatController {
    agent: Arc<dyn AgentClient>,
    phase: TurnPhase,
    hint_period: Duration,
}

impl ChatController {
    pub fn new(agent: Arc<dyn AgentClient>) -> Self {
        Self {
            agent,
            phase: TurnPhase::Idle,
            hint_period: DEFAULT_HINT_PERIOD,
        }
    }

    /// Override the hint cadence (tests run it under paused time).
    pub fn with_hint_period(mut self, period: Duration) -> Self {
        self.hint_period = period;
        self
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Run one turn to completion and return its terminal phase (`Rendered`
    /// or `Errored`); the controller itself is back at `Idle` when this
    /// returns. Blank input is a no-op that stays `Idle`.
    pub async fn submit(&mut self, input: &str, sink: Arc<dyn ChatSink>) -> TurnPhase {
        let text = input.trim();
        if text.is_empty() {
            return TurnPhase::Idle;
        }

        self.phase = TurnPhase::Sending;
        sink.user_message(text);

        let ticker = spawn_thinking_ticker(sink.clone(), self.hint_period);
        let result = self.agent.ask(text).await;
        // Single cancellation point before leaving Sending, on every path.
        ticker.abort();

        let outcome = match result {
            Ok(answer) if !answer.trim().is_empty() => {
                sink.agent_html(&render_citations(&answer));
                TurnPhase::Rendered
            }
            Ok(_) => {
                sink.error("Error: empty answer");
                TurnPhase::Errored
            }
            Err(e) => {
                sink.error(&format!("Error: {e:#}"));
                TurnPhase::Errored
            }
        };

        debug!(agent = self.agent.name(), outcome = ?outcome, "turn finished");
        self.phase = TurnPhase::Idle;
        outcome
    }
}

fn spawn_thinking_ticker(sink: Arc<dyn ChatSink>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The interval's first tick completes immediately; skip it so the
        // first hint lands one period in.
        ticker.tick().await;
        let mut step = 0usize;
        loop {
            ticker.tick().await;
            sink.thinking_hint(THINKING_HINTS[step.min(THINKING_HINTS.len() - 1)]);
            step += 1;
        }
    })
}
