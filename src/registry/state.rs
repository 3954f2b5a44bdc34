use chrono::{DateTime, Utc};
use serde::Serialize;

/// Lifecycle of one registry entry.
///
/// `Joining` and `Leaving` cover the blocking handshakes with the runtime.
/// An entry in any state blocks new reservations for the same call id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Joining,
    Active,
    Leaving,
}

/// Snapshot of one session, as returned by the listing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub call_id: String,
    pub state: SessionState,
    pub started_at: DateTime<Utc>,
}

/// Successful result of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A fresh session joined the call.
    Joined,
    /// A session for this call id already exists; nothing was done.
    AlreadyActive,
}

impl StartOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            StartOutcome::Joined => "Agent joined",
            StartOutcome::AlreadyActive => "Agent already active",
        }
    }
}

/// Successful result of a stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The session left the call and its entry was removed.
    Left,
    /// No session existed for this call id; nothing was done.
    NotActive,
}

impl StopOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            StopOutcome::Left => "Agent left",
            StopOutcome::NotActive => "No active session",
        }
    }
}
