//! HTTP control API
//!
//! - POST /agent/start - Join an assistant to a call
//! - POST /agent/stop - Remove the assistant from a call
//! - GET /agent/sessions - List live sessions
//! - GET /health - Health check
//!
//! Start/stop are idempotent: repeating a request returns 200 with a
//! descriptive message. Capability failures return 500 with a `detail`
//! field.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
