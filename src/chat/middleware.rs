//! Chat API shared state and middleware

use std::sync::Arc;

use crate::agent::Agent;
use crate::model::config::ImageMimePolicy;

use super::encoder::PayloadEncoder;
use super::gateway::AgentGateway;

/// Application shared state
///
/// Immutable after startup; every request works on its own data.
#[derive(Clone)]
pub struct AppState {
    pub encoder: PayloadEncoder,
    pub gateway: AgentGateway,
}

impl AppState {
    /// Create new application state around an agent
    pub fn new(agent: Arc<dyn Agent>) -> Self {
        Self {
            encoder: PayloadEncoder::default(),
            gateway: AgentGateway::new(agent),
        }
    }

    /// Set image MIME policy
    pub fn with_mime_policy(mut self, policy: ImageMimePolicy) -> Self {
        self.encoder = PayloadEncoder::new(policy);
        self
    }
}

/// CORS middleware layer
///
/// Allows any origin, method and header so browser front ends on other
/// origins can post to `/chat`.
pub fn cors_layer() -> tower_http::cors::CorsLayer {
    use tower_http::cors::{Any, CorsLayer};

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
