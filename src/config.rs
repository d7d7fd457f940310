// src/config.rs
//! Environment-provided credentials and identifiers for the hosted agent and
//! ChatKit session endpoints. A missing value is a configuration error for
//! the endpoint that needs it; the endpoint is disabled rather than retried.

use tracing::info;

use crate::agent::{ResearchAgent, SessionIssuer};

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_VECTOR_STORE_ID: &str = "VS_ID";
pub const ENV_WORKFLOW_ID: &str = "WF_ID";
pub const ENV_AGENT_ID: &str = "AGENT_ID";

#[derive(Debug, Clone, Default)]
pub struct AgentSettings {
    pub api_key: Option<String>,
    pub vector_store_id: Option<String>,
    pub workflow_id: Option<String>,
    pub agent_id: Option<String>,
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

impl AgentSettings {
    pub fn from_env() -> Self {
        let settings = Self {
            api_key: non_empty(ENV_API_KEY),
            vector_store_id: non_empty(ENV_VECTOR_STORE_ID),
            workflow_id: non_empty(ENV_WORKFLOW_ID),
            agent_id: non_empty(ENV_AGENT_ID),
        };
        // Safe diagnostics: presence only, never values.
        info!(
            api_key = settings.api_key.is_some(),
            vector_store = settings.vector_store_id.is_some(),
            workflow = settings.workflow_id.is_some(),
            agent_id = settings.agent_id.is_some(),
            "agent settings loaded"
        );
        settings
    }

    /// Build the research agent if its required credentials are present.
    pub fn research_agent(&self) -> Option<ResearchAgent> {
        let api_key = self.api_key.clone()?;
        let vector_store_id = self.vector_store_id.clone()?;
        Some(ResearchAgent::new(
            api_key,
            vector_store_id,
            self.workflow_id.clone(),
        ))
    }

    /// Build the ChatKit session issuer if its required credentials are
    /// present.
    pub fn session_issuer(&self) -> Option<SessionIssuer> {
        let api_key = self.api_key.clone()?;
        let agent_id = self.agent_id.clone()?;
        Some(SessionIssuer::new(api_key, agent_id))
    }
}
