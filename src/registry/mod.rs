//! Session registry
//!
//! This module owns the call-id → session mapping and the start/stop
//! protocol that guarantees at most one active assistant per call id under
//! concurrent access:
//! - `start` atomically reserves the call id before any blocking work
//! - `stop` serializes behind an in-flight join for the same id
//! - operations on different call ids never block one another

mod registry;
mod state;

pub use registry::SessionRegistry;
pub use state::{SessionInfo, SessionState, StartOutcome, StopOutcome};
