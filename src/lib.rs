pub mod agent;
pub mod config;
pub mod error;
pub mod http;
pub mod instructions;
pub mod registry;

pub use agent::{AgentConfig, AgentFactory, AgentHandle, LlmConfig, RuntimeAgentFactory, TtsConfig};
pub use config::{AgentSettings, Config, HttpConfig, Secrets, ServiceConfig};
pub use error::Error;
pub use http::{create_router, AppState};
pub use registry::{SessionInfo, SessionRegistry, SessionState, StartOutcome, StopOutcome};
