//! Chat request error types

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// Fixed message returned for requests with neither text nor image
pub const EMPTY_REQUEST_MESSAGE: &str = "Message and image both are empty";

/// Failures raised before the agent is called
#[derive(Debug)]
pub enum ChatError {
    /// Message is blank and no image was attached
    EmptyRequest,

    /// Request body could not be parsed as a form
    InvalidForm(String),

    /// Uploaded image bytes could not be read
    ImageRead(String),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::EmptyRequest => f.write_str(EMPTY_REQUEST_MESSAGE),
            ChatError::InvalidForm(msg) => write!(f, "Invalid form data: {}", msg),
            ChatError::ImageRead(msg) => write!(f, "Failed to read image: {}", msg),
        }
    }
}

impl std::error::Error for ChatError {}

impl ChatError {
    /// Get corresponding HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::EmptyRequest | ChatError::InvalidForm(_) | ChatError::ImageRead(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        tracing::warn!("Rejected chat request: {}", self);
        (self.status_code(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
