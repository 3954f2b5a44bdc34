// Shared mock agent runtime for integration tests.
#![allow(dead_code)]

use agent_control::{
    AgentConfig, AgentFactory, AgentHandle, AgentSettings, Config, Error, HttpConfig, Secrets,
    ServiceConfig, SessionRegistry,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Counts capability invocations and fails or stalls on demand.
#[derive(Default)]
pub struct MockRuntime {
    pub creates: AtomicUsize,
    pub joins: AtomicUsize,
    pub leaves: AtomicUsize,
    pub fail_join: AtomicBool,
    pub fail_leave: AtomicBool,
    pub create_delay: Mutex<Option<Duration>>,
    pub join_delay: Mutex<Option<Duration>>,
    pub leave_delay: Mutex<Option<Duration>>,
    pub last_instructions: Mutex<Option<String>>,
}

impl MockRuntime {
    pub fn join_count(&self) -> usize {
        self.joins.load(Ordering::SeqCst)
    }

    pub fn leave_count(&self) -> usize {
        self.leaves.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn set_create_delay(&self, delay: Duration) {
        *self.create_delay.lock().unwrap() = Some(delay);
    }

    pub fn set_join_delay(&self, delay: Duration) {
        *self.join_delay.lock().unwrap() = Some(delay);
    }

    pub fn set_leave_delay(&self, delay: Duration) {
        *self.leave_delay.lock().unwrap() = Some(delay);
    }
}

pub struct MockFactory(pub Arc<MockRuntime>);

#[async_trait::async_trait]
impl AgentFactory for MockFactory {
    async fn create(&self, config: AgentConfig) -> Result<Box<dyn AgentHandle>, Error> {
        let delay = *self.0.create_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.0.creates.fetch_add(1, Ordering::SeqCst);
        *self.0.last_instructions.lock().unwrap() = Some(config.instructions.clone());
        Ok(Box::new(MockAgent(Arc::clone(&self.0))))
    }
}

struct MockAgent(Arc<MockRuntime>);

#[async_trait::async_trait]
impl AgentHandle for MockAgent {
    async fn join(&self, _call_type: &str, _call_id: &str) -> Result<(), Error> {
        let delay = *self.0.join_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.0.joins.fetch_add(1, Ordering::SeqCst);
        if self.0.fail_join.load(Ordering::SeqCst) {
            return Err(Error::Runtime("join rejected".to_string()));
        }
        Ok(())
    }

    async fn leave(&self) -> Result<(), Error> {
        let delay = *self.0.leave_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.0.leaves.fetch_add(1, Ordering::SeqCst);
        if self.0.fail_leave.load(Ordering::SeqCst) {
            return Err(Error::Runtime("leave rejected".to_string()));
        }
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        service: ServiceConfig {
            name: "agent-control-test".to_string(),
            http: HttpConfig {
                bind: "127.0.0.1".to_string(),
                port: 0,
            },
        },
        agent: AgentSettings {
            llm_provider: "openai".to_string(),
            llm_model: "gpt-4o".to_string(),
            tts_provider: "elevenlabs".to_string(),
            call_type: "default".to_string(),
            join_timeout_secs: 2,
            leave_timeout_secs: 2,
            runtime_url: "http://localhost:8100".to_string(),
        },
        secrets: test_secrets(),
    }
}

pub fn test_secrets() -> Secrets {
    Secrets {
        stream_api_key: "stream-key".to_string(),
        stream_secret_key: "stream-secret".to_string(),
        openai_api_key: "openai-key".to_string(),
        elevenlabs_api_key: "elevenlabs-key".to_string(),
    }
}

pub fn test_registry(runtime: &Arc<MockRuntime>) -> Arc<SessionRegistry> {
    test_registry_with_config(runtime, test_config())
}

pub fn test_registry_with_config(
    runtime: &Arc<MockRuntime>,
    config: Config,
) -> Arc<SessionRegistry> {
    Arc::new(SessionRegistry::new(
        Arc::new(MockFactory(Arc::clone(runtime))),
        config,
    ))
}
