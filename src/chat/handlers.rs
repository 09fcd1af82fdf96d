//! Chat API Handler functions

use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use tracing::Instrument;
use uuid::Uuid;

use super::extract::read_incoming;
use super::mapper::map_outcome;
use super::middleware::AppState;
use super::types::IncomingRequest;
use super::validator::validate;

/// POST /chat
///
/// Relays the user's message (and optional image) to the agent.
pub async fn post_chat(State(state): State<AppState>, request: Request) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id);

    async move {
        match read_incoming(request).await {
            Ok(incoming) => handle_chat(&state, incoming).await,
            Err(err) => err.into_response(),
        }
    }
    .instrument(span)
    .await
}

/// Run one request through validate → encode → dispatch → map
pub async fn handle_chat(state: &AppState, incoming: IncomingRequest) -> Response {
    tracing::info!(
        message_len = incoming.message.len(),
        has_image = incoming.image.is_some(),
        image_type = incoming
            .image
            .as_ref()
            .and_then(|i| i.content_type.as_deref())
            .unwrap_or("-"),
        "Received POST /chat request"
    );

    let message = match validate(incoming).and_then(|request| state.encoder.encode(request)) {
        Ok(message) => message,
        Err(err) => return err.into_response(),
    };

    let outcome = state.gateway.dispatch(message).await;
    map_outcome(outcome)
}
