use super::{AgentConfig, AgentFactory, AgentHandle};
use crate::error::Error;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// HTTP client for the external agent-runtime service.
///
/// The runtime owns the media session; this service only drives its
/// lifecycle:
/// - `POST {base}/agents` with the agent configuration → `{agent_id}`
/// - `POST {base}/agents/{id}/join` with `{call_type, call_id}`
/// - `POST {base}/agents/{id}/leave`
pub struct RuntimeAgentFactory {
    base_url: String,
    client: reqwest::Client,
}

impl RuntimeAgentFactory {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateAgentResponse {
    agent_id: String,
}

#[async_trait::async_trait]
impl AgentFactory for RuntimeAgentFactory {
    async fn create(&self, config: AgentConfig) -> Result<Box<dyn AgentHandle>, Error> {
        let url = format!("{}/agents", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&config)
            .send()
            .await
            .map_err(transport_error)?;
        let response = into_runtime_error(response).await?;
        let created: CreateAgentResponse = response
            .json()
            .await
            .map_err(|_| Error::Runtime("malformed create-agent response".to_string()))?;

        debug!(agent_id = %created.agent_id, "agent created on runtime");

        Ok(Box::new(RuntimeAgent {
            base_url: self.base_url.clone(),
            agent_id: created.agent_id,
            client: self.client.clone(),
        }))
    }
}

/// Handle to one assistant hosted on the runtime service.
struct RuntimeAgent {
    base_url: String,
    agent_id: String,
    client: reqwest::Client,
}

#[async_trait::async_trait]
impl AgentHandle for RuntimeAgent {
    async fn join(&self, call_type: &str, call_id: &str) -> Result<(), Error> {
        let url = format!("{}/agents/{}/join", self.base_url, self.agent_id);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "call_type": call_type, "call_id": call_id }))
            .send()
            .await
            .map_err(transport_error)?;
        into_runtime_error(response).await?;
        Ok(())
    }

    async fn leave(&self) -> Result<(), Error> {
        let url = format!("{}/agents/{}/leave", self.base_url, self.agent_id);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(transport_error)?;
        into_runtime_error(response).await?;
        Ok(())
    }
}

/// Strips the URL (which may embed the agent id) from transport errors.
fn transport_error(err: reqwest::Error) -> Error {
    Error::Runtime(err.without_url().to_string())
}

/// Maps a non-2xx response into a runtime error carrying a truncated body.
async fn into_runtime_error(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let snippet: String = body.chars().take(200).collect();
    Err(Error::Runtime(format!("runtime returned {status}: {snippet}")))
}
