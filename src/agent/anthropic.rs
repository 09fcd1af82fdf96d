//! Anthropic Messages API agent
//!
//! Sends each multimodal message as a single user turn and returns the text
//! of the assistant's answer. No retries: one upstream call per request.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::chat::types::MultimodalMessage;
use crate::http_client::{ProxyConfig, build_client};
use crate::model::config::{AgentConfig, TlsBackend};

use super::errors::inspect_upstream_error;
use super::types::{Message, MessagesRequest, MessagesResponse};
use super::{Agent, AgentError};

/// Agent backed by an Anthropic Messages compatible endpoint
pub struct AnthropicAgent {
    client: Client,
    config: AgentConfig,
    api_key: String,
}

impl AnthropicAgent {
    /// Create a new agent
    ///
    /// # Arguments
    /// * `config` - Agent settings (endpoint, model, limits)
    /// * `api_key` - Provider API key
    /// * `proxy` - Optional outbound proxy
    /// * `tls_backend` - TLS implementation for the HTTP client
    pub fn new(
        config: AgentConfig,
        api_key: impl Into<String>,
        proxy: Option<&ProxyConfig>,
        tls_backend: TlsBackend,
    ) -> anyhow::Result<Self> {
        let client = build_client(proxy, config.timeout_secs, tls_backend)?;
        Ok(Self {
            client,
            config,
            api_key: api_key.into(),
        })
    }

    /// Messages endpoint URL
    pub fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// Model requests are sent to
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_headers(&self) -> Result<HeaderMap, AgentError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|_| AgentError::Config("API key contains invalid characters".to_string()))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&self.config.anthropic_version).map_err(|_| {
                AgentError::Config("anthropicVersion contains invalid characters".to_string())
            })?,
        );
        Ok(headers)
    }

    fn build_request(&self, message: &MultimodalMessage) -> MessagesRequest {
        MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            system: self
                .config
                .system_prompt
                .clone()
                .filter(|prompt| !prompt.trim().is_empty()),
            messages: vec![Message::user(message)],
        }
    }
}

#[async_trait]
impl Agent for AnthropicAgent {
    async fn invoke(&self, message: MultimodalMessage) -> Result<String, AgentError> {
        let headers = self.build_headers()?;
        let request = self.build_request(&message);

        tracing::debug!(
            model = %request.model,
            max_tokens = request.max_tokens,
            text_len = message.text().len(),
            has_image = message.image().is_some(),
            "Sending request to agent"
        );

        let response = self
            .client
            .post(self.messages_url())
            .headers(headers)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let info = inspect_upstream_error(status.as_u16(), &body);
            tracing::warn!(
                status = status.as_u16(),
                error_type = %info.error_type,
                hint = info.hint.unwrap_or("-"),
                "Agent request rejected by upstream: {}",
                info.message
            );
            tracing::debug!("Upstream error body: {}", body);
            return Err(AgentError::Upstream {
                status: status.as_u16(),
                message: info.message,
            });
        }

        let body: MessagesResponse = response.json().await?;
        tracing::debug!(
            model = body.model.as_deref().unwrap_or("-"),
            stop_reason = body.stop_reason.as_deref().unwrap_or("-"),
            "Agent response received"
        );

        let reply = body.reply_text();
        if reply.trim().is_empty() {
            return Err(AgentError::EmptyReply);
        }
        Ok(reply)
    }
}
