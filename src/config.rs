use crate::error::Error;
use anyhow::Result;
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub agent: AgentSettings,
    #[serde(default)]
    pub secrets: Secrets,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentSettings {
    /// Language model provider and model for new assistants
    pub llm_provider: String,
    pub llm_model: String,

    /// Speech synthesis provider
    pub tts_provider: String,

    /// Call type passed to the join handshake
    pub call_type: String,

    /// Bounds on the join/leave handshakes with the runtime
    pub join_timeout_secs: u64,
    pub leave_timeout_secs: u64,

    /// Base URL of the agent runtime service
    pub runtime_url: String,
}

/// Provider credentials, loaded once at startup.
///
/// Values may come from the config file, but each one falls back to the
/// conventional environment variable when left empty.
#[derive(Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub stream_api_key: String,
    #[serde(default)]
    pub stream_secret_key: String,
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub elevenlabs_api_key: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secrets { .. }")
    }
}

impl Secrets {
    fn fill_from_env(&mut self) {
        fill(&mut self.stream_api_key, "STREAM_API_KEY");
        fill(&mut self.stream_secret_key, "STREAM_SECRET_KEY");
        fill(&mut self.openai_api_key, "OPENAI_API_KEY");
        fill(&mut self.elevenlabs_api_key, "ELEVENLABS_API_KEY");
    }

    /// Checks that every credential is present. Called before any agent is
    /// constructed so a misconfigured process fails the start request
    /// instead of producing a malformed session.
    pub fn validate(&self) -> Result<(), Error> {
        let required = [
            ("STREAM_API_KEY", &self.stream_api_key),
            ("STREAM_SECRET_KEY", &self.stream_secret_key),
            ("OPENAI_API_KEY", &self.openai_api_key),
            ("ELEVENLABS_API_KEY", &self.elevenlabs_api_key),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(Error::Configuration(format!(
                    "missing required secret {name}"
                )));
            }
        }
        Ok(())
    }
}

fn fill(slot: &mut String, var: &str) {
    if slot.is_empty() {
        if let Ok(value) = std::env::var(var) {
            *slot = value;
        }
    }
}

impl Config {
    /// Loads configuration from an optional file, with built-in defaults
    /// for everything except secrets.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("service.name", "agent-control")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 8000)?
            .set_default("agent.llm_provider", "openai")?
            .set_default("agent.llm_model", "gpt-4o")?
            .set_default("agent.tts_provider", "elevenlabs")?
            .set_default("agent.call_type", "default")?
            .set_default("agent.join_timeout_secs", 30)?
            .set_default("agent.leave_timeout_secs", 10)?
            .set_default("agent.runtime_url", "http://localhost:8100")?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        let mut cfg: Config = builder.build()?.try_deserialize()?;
        cfg.secrets.fill_from_env();
        Ok(cfg)
    }
}
