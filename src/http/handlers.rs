use super::state::AppState;
use crate::error::Error;
use crate::registry::SessionInfo;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartAgentRequest {
    /// Identifier of the video call the assistant should join
    pub call_id: String,

    /// Free-form context values folded into the assistant's instructions
    #[serde(default)]
    pub context: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct StopAgentRequest {
    pub call_id: String,
}

#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /agent/start
/// Join an assistant to the given call
pub async fn start_agent(
    State(state): State<AppState>,
    Json(req): Json<StartAgentRequest>,
) -> Response {
    if req.call_id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                detail: "call_id must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    info!(call_id = %req.call_id, "start agent requested");

    match state.registry.start(&req.call_id, &req.context).await {
        Ok(outcome) => Json(AgentResponse {
            success: true,
            message: outcome.message().to_string(),
        })
        .into_response(),
        Err(err) => {
            error!(call_id = %req.call_id, error = %err, "failed to start agent");
            error_response(err)
        }
    }
}

/// POST /agent/stop
/// Remove the assistant from the given call
pub async fn stop_agent(
    State(state): State<AppState>,
    Json(req): Json<StopAgentRequest>,
) -> Response {
    if req.call_id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                detail: "call_id must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    info!(call_id = %req.call_id, "stop agent requested");

    match state.registry.stop(&req.call_id).await {
        Ok(outcome) => Json(AgentResponse {
            success: true,
            message: outcome.message().to_string(),
        })
        .into_response(),
        Err(err) => {
            error!(call_id = %req.call_id, error = %err, "failed to stop agent");
            error_response(err)
        }
    }
}

/// GET /agent/sessions
/// List all live sessions
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionInfo>> {
    Json(state.registry.sessions().await)
}

/// GET /health
/// Health check endpoint, independent of registry state
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

fn error_response(err: Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            detail: err.to_string(),
        }),
    )
        .into_response()
}
