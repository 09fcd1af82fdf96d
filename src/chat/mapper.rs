//! Response mapping: agent outcome to HTTP status and JSON body

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::{AgentOutcome, ErrorResponse, ReplyResponse};

/// `Success` → 200 `{"reply"}`, `Failure` → 500 `{"error"}`
pub fn map_outcome(outcome: AgentOutcome) -> Response {
    match outcome {
        AgentOutcome::Success { reply } => (StatusCode::OK, Json(ReplyResponse { reply })).into_response(),
        AgentOutcome::Failure { reason } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(reason)),
        )
            .into_response(),
    }
}
