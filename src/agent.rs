// src/agent.rs
//! Outbound OpenAI clients: the research agent behind `/api/ask` and the
//! ChatKit session issuer behind `/api/chatkit/session`. No retries and no
//! timeouts beyond reqwest's defaults; failures surface to the caller.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const RESPONSES_URL: &str = "https://api.openai.com/v1/responses";
const CHATKIT_SESSIONS_URL: &str = "https://api.openai.com/v1/chatkit/sessions";

const AGENT_MODEL: &str = "gpt-5";

/// Fixed instruction prompt for the research agent. Answers read like a short
/// report: bullet style, inline [1]/[2] markers, a trailing **Sources** list.
const AGENT_INSTRUCTIONS: &str = "\
You are a research agent analyzing AI insights published by MBB \
(McKinsey, BCG, Bain). Write answers as a human-readable report summary.
- Use bullet style, ending each claim with a [1], [2] source marker
- Finish with a **Sources** list
- Express figures, percentages, and amounts in natural language
- Keep Markdown formatting";

/// One question in, one answer out. The hosted service owns all reasoning and
/// retrieval; any conversational context lives on its side, not ours.
#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn ask(&self, message: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// Agent client backed by the OpenAI Responses API with a file-search tool
/// scoped to one vector store.
pub struct ResearchAgent {
    http: reqwest::Client,
    api_key: String,
    vector_store_id: String,
    workflow_id: Option<String>,
    model: String,
}

impl ResearchAgent {
    pub fn new(api_key: String, vector_store_id: String, workflow_id: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("mbb-insights/0.1")
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_key,
            vector_store_id,
            workflow_id,
            model: AGENT_MODEL.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ResponsesOut {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

impl ResponsesOut {
    /// Concatenate the text parts of message items, skipping reasoning and
    /// tool-call items.
    fn final_text(&self) -> String {
        let mut out = String::new();
        for item in &self.output {
            if item.kind != "message" {
                continue;
            }
            for part in &item.content {
                if part.kind == "output_text" {
                    out.push_str(&part.text);
                }
            }
        }
        out.trim().to_string()
    }
}

#[async_trait]
impl AgentClient for ResearchAgent {
    async fn ask(&self, message: &str) -> Result<String> {
        let mut req = json!({
            "model": self.model,
            "instructions": AGENT_INSTRUCTIONS,
            "input": [
                { "role": "user", "content": [{ "type": "input_text", "text": message }] }
            ],
            "tools": [
                { "type": "file_search", "vector_store_ids": [self.vector_store_id] }
            ],
            "reasoning": { "effort": "medium", "summary": "auto" },
            "store": true,
        });
        if let Some(wf) = &self.workflow_id {
            req["metadata"] = json!({ "workflow_id": wf });
        }

        let resp = self
            .http
            .post(RESPONSES_URL)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("agent request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("agent returned {status}: {}", extract_error_message(&body));
        }

        let out: ResponsesOut = resp.json().await.context("parsing agent response")?;
        let answer = out.final_text();
        if answer.is_empty() {
            anyhow::bail!("agent returned no text output");
        }
        Ok(answer)
    }

    fn name(&self) -> &'static str {
        "openai-responses"
    }
}

/// Issues short-lived ChatKit client secrets for the embedded chat SDK.
pub struct SessionIssuer {
    http: reqwest::Client,
    api_key: String,
    agent_id: String,
}

impl SessionIssuer {
    pub fn new(api_key: String, agent_id: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("mbb-insights/0.1")
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_key,
            agent_id,
        }
    }

    /// Create one session and return its opaque client secret.
    pub async fn create(&self) -> Result<serde_json::Value> {
        let resp = self
            .http
            .post(CHATKIT_SESSIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&json!({ "agent_id": self.agent_id }))
            .send()
            .await
            .context("chatkit session request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!(
                "chatkit session returned {status}: {}",
                extract_error_message(&body)
            );
        }

        let body: serde_json::Value = resp.json().await.context("parsing session response")?;
        body.get("client_secret")
            .cloned()
            .context("session response missing client_secret")
    }
}

/// Best-effort extraction of `error.message` (or `error`) from an upstream
/// error body; falls back to a truncated copy of the raw body.
fn extract_error_message(body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = v
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return msg.to_string();
        }
        if let Some(msg) = v.get("error").and_then(|e| e.as_str()) {
            return msg.to_string();
        }
    }
    body.chars().take(200).collect()
}
