//! Agent gateway: one agent call per request, failures captured as outcomes

use std::sync::Arc;

use crate::agent::Agent;

use super::types::{AgentOutcome, MultimodalMessage};

#[derive(Clone)]
pub struct AgentGateway {
    agent: Arc<dyn Agent>,
}

impl AgentGateway {
    pub fn new(agent: Arc<dyn Agent>) -> Self {
        Self { agent }
    }

    /// Invoke the agent once and capture the result
    ///
    /// Errors never escape: they become [`AgentOutcome::Failure`] carrying the
    /// error's description. No retry, no timeout beyond the agent's own.
    pub async fn dispatch(&self, message: MultimodalMessage) -> AgentOutcome {
        match self.agent.invoke(message).await {
            Ok(reply) => AgentOutcome::Success { reply },
            Err(err) => {
                tracing::warn!(
                    upstream_status = ?err.upstream_status(),
                    "Agent call failed: {}",
                    err
                );
                AgentOutcome::Failure {
                    reason: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingAgent {
        calls: AtomicUsize,
        result: Result<String, AgentError>,
    }

    #[async_trait]
    impl Agent for CountingAgent {
        async fn invoke(&self, _message: MultimodalMessage) -> Result<String, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn test_success_is_captured() {
        let agent = Arc::new(CountingAgent {
            calls: AtomicUsize::new(0),
            result: Ok("Paris is the capital of France.".to_string()),
        });
        let gateway = AgentGateway::new(agent.clone());

        let outcome = gateway
            .dispatch(MultimodalMessage::new("What is the capital of France?", None))
            .await;

        assert_eq!(
            outcome,
            AgentOutcome::Success {
                reply: "Paris is the capital of France.".to_string()
            }
        );
        assert_eq!(agent.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_captured_without_retry() {
        let agent = Arc::new(CountingAgent {
            calls: AtomicUsize::new(0),
            result: Err(AgentError::Upstream {
                status: 429,
                message: "rate limit exceeded".to_string(),
            }),
        });
        let gateway = AgentGateway::new(agent.clone());

        let outcome = gateway.dispatch(MultimodalMessage::new("hi", None)).await;

        assert_eq!(
            outcome,
            AgentOutcome::Failure {
                reason: "rate limit exceeded".to_string()
            }
        );
        assert_eq!(agent.calls.load(Ordering::SeqCst), 1);
    }
}
