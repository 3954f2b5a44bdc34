use thiserror::Error as ThisError;

/// Service errors, grouped by kind.
///
/// Every message carried here is written for callers: provider responses
/// are truncated and transport errors are stripped of URLs before they are
/// wrapped, so the `Display` output is safe to return over HTTP.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A required secret or setting is missing. Detected before any
    /// capability call is made.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The join handshake failed or timed out. The registry entry was
    /// rolled back, so a retry starts fresh.
    #[error("failed to join call: {0}")]
    Join(String),

    /// The leave call failed or timed out. The registry entry was removed
    /// anyway, so the call id is available for future starts.
    #[error("failed to leave call: {0}")]
    Leave(String),

    /// The agent runtime rejected a request or was unreachable.
    #[error("agent runtime error: {0}")]
    Runtime(String),
}
