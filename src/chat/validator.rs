//! Request validation

use super::error::ChatError;
use super::types::IncomingRequest;

/// Reject requests that carry neither text nor an image
///
/// A message made only of whitespace counts as empty. Anything else passes
/// through untouched, including an empty message next to an image.
pub fn validate(request: IncomingRequest) -> Result<IncomingRequest, ChatError> {
    if request.message.trim().is_empty() && request.image.is_none() {
        return Err(ChatError::EmptyRequest);
    }
    Ok(request)
}
