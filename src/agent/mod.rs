//! Agent runtime capability
//!
//! The registry treats a joined assistant as an opaque handle exposing
//! `join` and `leave`. Production wiring talks to the external agent
//! runtime over HTTP (see `runtime`); tests substitute their own factory.

mod runtime;

pub use runtime::RuntimeAgentFactory;

use crate::error::Error;
use serde::Serialize;

/// Language model provider selection.
#[derive(Clone, Serialize)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
}

/// Speech synthesis provider selection.
#[derive(Clone, Serialize)]
pub struct TtsConfig {
    pub provider: String,
    pub api_key: String,
}

/// Everything the runtime needs to construct an assistant for one call.
///
/// Carries API keys, so no `Debug` impl.
#[derive(Clone, Serialize)]
pub struct AgentConfig {
    pub stream_api_key: String,
    pub stream_secret: String,
    pub llm: LlmConfig,
    pub tts: TtsConfig,
    pub instructions: String,
}

/// A live assistant bound to one call. The registry owns the handle
/// exclusively once created.
#[async_trait::async_trait]
pub trait AgentHandle: Send + Sync {
    /// Join the given call. Blocks for the duration of the external
    /// handshake.
    async fn join(&self, call_type: &str, call_id: &str) -> Result<(), Error>;

    /// Leave the call. May block.
    async fn leave(&self) -> Result<(), Error>;
}

/// Constructs assistant handles from a per-call configuration.
#[async_trait::async_trait]
pub trait AgentFactory: Send + Sync {
    async fn create(&self, config: AgentConfig) -> Result<Box<dyn AgentHandle>, Error>;
}
