//! Upstream error inspection
//!
//! Pulls the provider's own message out of an error response body and pairs
//! it with an operator hint for the logs.

use serde_json::Value;

/// Structured information about an upstream error
#[derive(Debug, Clone)]
pub struct UpstreamErrorInfo {
    /// Error type reported by the provider
    pub error_type: String,
    /// Provider's message, returned to the client unchanged
    pub message: String,
    /// Operator-facing explanation, only logged
    pub hint: Option<&'static str>,
}

/// Inspect an upstream error response body
///
/// Expected format: `{"type": "error", "error": {"type": "...", "message": "..."}}`.
/// Bodies without `error.message` are passed through as the message; an empty
/// body falls back to the HTTP status.
pub fn inspect_upstream_error(status: u16, body: &str) -> UpstreamErrorInfo {
    let json = serde_json::from_str::<Value>(body).ok();
    let error = json.as_ref().and_then(|v| v.get("error"));

    let error_type = error
        .and_then(|e| e.get("type"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    let message = error
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let body = body.trim();
            if body.is_empty() {
                format!("Upstream returned HTTP {}", status)
            } else {
                body.to_string()
            }
        });

    let hint = match error_type.as_str() {
        "rate_limit_error" => Some("rate limited by the model provider, clients should back off"),
        "overloaded_error" => Some("model provider is overloaded"),
        "authentication_error" => Some("check agent.apiKey"),
        "request_too_large" => Some("request exceeds the provider size limit, consider lowering maxRequestBodyBytes"),
        _ => None,
    };

    UpstreamErrorInfo {
        error_type,
        message,
        hint,
    }
}
