use super::state::{SessionInfo, SessionState, StartOutcome, StopOutcome};
use crate::agent::{AgentConfig, AgentFactory, AgentHandle, LlmConfig, TtsConfig};
use crate::config::Config;
use crate::error::Error;
use crate::instructions;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Handle slot for one session.
///
/// The mutex serializes the blocking join/leave handshakes for a single
/// call id; `None` means no live handle (the join has not finished, or a
/// stop already took it).
type HandleSlot = Arc<Mutex<Option<Box<dyn AgentHandle>>>>;

struct SessionEntry {
    state: SessionState,
    started_at: DateTime<Utc>,
    slot: HandleSlot,
}

/// Concurrency-safe call-id → session mapping.
///
/// The map lock is held only for reservation, bookkeeping, and removal,
/// never across an await of the runtime. Inserting the `Joining` entry and
/// returning the "already active" short-circuit happen under that single
/// lock, so two concurrent starts for the same call id can never both
/// reach the runtime. The per-entry slot lock is held across the join
/// handshake, which is what lets a stop for the same id wait its turn
/// while other call ids proceed untouched.
pub struct SessionRegistry {
    factory: Arc<dyn AgentFactory>,
    config: Config,
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new(factory: Arc<dyn AgentFactory>, config: Config) -> Self {
        Self {
            factory,
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Starts an assistant session for `call_id`.
    ///
    /// Idempotent: if an entry already exists in any state, reports
    /// `AlreadyActive` without touching the runtime. Otherwise the call id
    /// is reserved before any blocking work begins; on join failure or
    /// timeout the reservation is rolled back so a retry starts fresh.
    pub async fn start(&self, call_id: &str, context: &[Value]) -> Result<StartOutcome, Error> {
        // Reserve-or-reject under a single hold of the map lock.
        let mut slot_guard = {
            let mut sessions = self.sessions.lock().await;
            match sessions.entry(call_id.to_string()) {
                Entry::Occupied(entry) => {
                    debug!(call_id, state = ?entry.get().state, "session already present");
                    return Ok(StartOutcome::AlreadyActive);
                }
                Entry::Vacant(vacant) => {
                    let slot: HandleSlot = Arc::new(Mutex::new(None));
                    // The slot is not shared until the insert below, so
                    // this resolves immediately. Holding the guard across
                    // the join keeps later stops for this id ordered
                    // after us.
                    let guard = slot.clone().lock_owned().await;
                    vacant.insert(SessionEntry {
                        state: SessionState::Joining,
                        started_at: Utc::now(),
                        slot,
                    });
                    guard
                }
            }
        };

        info!(call_id, "joining call");

        match self.create_and_join(call_id, context).await {
            Ok(handle) => {
                *slot_guard = Some(handle);
                let mut sessions = self.sessions.lock().await;
                if let Some(entry) = sessions.get_mut(call_id) {
                    // A stop that raced in has already marked the entry
                    // Leaving; it takes the handle as soon as we release
                    // the slot.
                    if entry.state == SessionState::Joining {
                        entry.state = SessionState::Active;
                    }
                }
                info!(call_id, "agent joined call");
                Ok(StartOutcome::Joined)
            }
            Err(err) => {
                // Release the reservation before the slot unlocks, so a
                // stop waiting on the slot finds the entry already gone.
                {
                    let mut sessions = self.sessions.lock().await;
                    sessions.remove(call_id);
                }
                warn!(call_id, error = %err, "join failed, reservation released");
                Err(err)
            }
        }
    }

    /// Stops the assistant session for `call_id`.
    ///
    /// Idempotent: stopping an absent session is a successful no-op. A
    /// stop that arrives while a join for the same id is still in flight
    /// waits behind it and then leaves. A failed or timed-out leave still
    /// removes the entry; keeping it would lock the call id out of all
    /// future starts with no recovery path.
    pub async fn stop(&self, call_id: &str) -> Result<StopOutcome, Error> {
        let slot = {
            let mut sessions = self.sessions.lock().await;
            match sessions.get_mut(call_id) {
                None => {
                    debug!(call_id, "stop requested for unknown call");
                    return Ok(StopOutcome::NotActive);
                }
                Some(entry) => {
                    entry.state = SessionState::Leaving;
                    Arc::clone(&entry.slot)
                }
            }
        };

        // Waits for an in-flight join on this call id to resolve.
        let mut slot_guard = slot.lock_owned().await;
        let Some(handle) = slot_guard.take() else {
            // The join failed after our lookup and the starter already
            // released the reservation.
            debug!(call_id, "session vanished before leave");
            return Ok(StopOutcome::NotActive);
        };

        info!(call_id, "leaving call");

        let limit = Duration::from_secs(self.config.agent.leave_timeout_secs);
        let result = match timeout(limit, handle.leave()).await {
            Ok(Ok(())) => Ok(StopOutcome::Left),
            Ok(Err(err)) => Err(Error::Leave(err.to_string())),
            Err(_) => Err(Error::Leave(format!(
                "no response from runtime after {}s",
                limit.as_secs()
            ))),
        };

        {
            let mut sessions = self.sessions.lock().await;
            sessions.remove(call_id);
        }

        match &result {
            Ok(_) => info!(call_id, "agent left call"),
            Err(err) => warn!(call_id, error = %err, "leave failed, entry removed anyway"),
        }
        result
    }

    /// Snapshot of all live entries, ordered by call id.
    pub async fn sessions(&self) -> Vec<SessionInfo> {
        let sessions = self.sessions.lock().await;
        let mut out: Vec<SessionInfo> = sessions
            .iter()
            .map(|(call_id, entry)| SessionInfo {
                call_id: call_id.clone(),
                state: entry.state,
                started_at: entry.started_at,
            })
            .collect();
        out.sort_by(|a, b| a.call_id.cmp(&b.call_id));
        out
    }

    /// Whether any entry exists for `call_id`, in any state.
    pub async fn contains(&self, call_id: &str) -> bool {
        self.sessions.lock().await.contains_key(call_id)
    }

    /// Builds the agent and runs the join handshake, each bounded by the
    /// join timeout. Returns the live handle on success.
    async fn create_and_join(
        &self,
        call_id: &str,
        context: &[Value],
    ) -> Result<Box<dyn AgentHandle>, Error> {
        self.config.secrets.validate()?;

        let agent = &self.config.agent;
        let agent_config = AgentConfig {
            stream_api_key: self.config.secrets.stream_api_key.clone(),
            stream_secret: self.config.secrets.stream_secret_key.clone(),
            llm: LlmConfig {
                provider: agent.llm_provider.clone(),
                model: agent.llm_model.clone(),
                api_key: self.config.secrets.openai_api_key.clone(),
            },
            tts: TtsConfig {
                provider: agent.tts_provider.clone(),
                api_key: self.config.secrets.elevenlabs_api_key.clone(),
            },
            instructions: instructions::build(context),
        };

        let limit = Duration::from_secs(agent.join_timeout_secs);

        // Creation blocks on the runtime too, so it gets the same bound
        // as the join; the reservation must never outlive the timeout.
        let handle = match timeout(limit, self.factory.create(agent_config)).await {
            Ok(Ok(handle)) => handle,
            Ok(Err(Error::Configuration(msg))) => return Err(Error::Configuration(msg)),
            Ok(Err(err)) => return Err(Error::Join(err.to_string())),
            Err(_) => {
                return Err(Error::Join(format!(
                    "no response from runtime after {}s",
                    limit.as_secs()
                )))
            }
        };

        match timeout(limit, handle.join(&agent.call_type, call_id)).await {
            Ok(Ok(())) => Ok(handle),
            Ok(Err(err)) => Err(Error::Join(err.to_string())),
            Err(_) => Err(Error::Join(format!(
                "no response from runtime after {}s",
                limit.as_secs()
            ))),
        }
    }
}
