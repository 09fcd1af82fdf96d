//! Chat API routing configuration

use axum::{Router, extract::DefaultBodyLimit, routing::post};

use super::{
    handlers::post_chat,
    middleware::{AppState, cors_layer},
};

/// Create chat router
///
/// # Endpoints
/// - `POST /chat` - Send a message (and optional image) to the agent
///
/// # Arguments
/// * `state` - Shared encoder and agent gateway
/// * `max_body_bytes` - Request body limit, 0 disables it
pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    let body_limit = if max_body_bytes == 0 {
        DefaultBodyLimit::disable()
    } else {
        DefaultBodyLimit::max(max_body_bytes)
    };

    Router::new()
        .route("/chat", post(post_chat))
        .layer(body_limit)
        .layer(cors_layer())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, AgentError};
    use crate::chat::types::{ContentPart, MultimodalMessage};
    use crate::model::config::ImageMimePolicy;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
    };
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    const BOUNDARY: &str = "chat-relay-test-boundary";

    /// Deterministic agent that records every message it is given
    struct StubAgent {
        result: Result<String, AgentError>,
        received: Mutex<Vec<MultimodalMessage>>,
    }

    impl StubAgent {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(reply.to_string()),
                received: Mutex::new(Vec::new()),
            })
        }

        fn failing(reason: &str) -> Arc<Self> {
            Arc::new(Self {
                result: Err(AgentError::Upstream {
                    status: 429,
                    message: reason.to_string(),
                }),
                received: Mutex::new(Vec::new()),
            })
        }

        fn received(&self) -> Vec<MultimodalMessage> {
            self.received.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Agent for StubAgent {
        async fn invoke(&self, message: MultimodalMessage) -> Result<String, AgentError> {
            self.received.lock().unwrap().push(message);
            self.result.clone()
        }
    }

    fn app(agent: Arc<StubAgent>) -> Router {
        create_router(AppState::new(agent), 1024 * 1024)
    }

    fn multipart_body(message: Option<&str>, image: Option<(&str, &str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(message) = message {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"message\"\r\n\r\n{message}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, content_type, bytes)) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(message: Option<&str>, image: Option<(&str, &str, &[u8])>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(message, image)))
            .unwrap()
    }

    fn multipart_raw(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response: Response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_text_question_gets_reply() {
        let agent = StubAgent::replying("Paris is the capital of France.");
        let (status, body) = send(
            app(agent.clone()),
            multipart_request(Some("What is the capital of France?"), None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"reply": "Paris is the capital of France."}));

        let received = agent.received();
        assert_eq!(received.len(), 1);
        assert_eq!(
            received[0],
            MultimodalMessage::new("What is the capital of France?", None)
        );
    }

    #[tokio::test]
    async fn test_empty_request_is_rejected_before_agent() {
        for message in [None, Some(""), Some("   ")] {
            let agent = StubAgent::replying("unused");
            let (status, body) = send(app(agent.clone()), multipart_request(message, None)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"error": "Message and image both are empty"}));
            assert!(agent.received().is_empty());
        }
    }

    #[tokio::test]
    async fn test_image_without_text_is_dispatched() {
        let bytes: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
        let agent = StubAgent::replying("A tiny JPEG.");
        let (status, body) = send(
            app(agent.clone()),
            multipart_request(Some(""), Some(("photo.png", "image/png", bytes))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"reply": "A tiny JPEG."}));

        let received = agent.received();
        assert_eq!(received.len(), 1);
        let parts = received[0].parts();
        assert_eq!(parts.len(), 2);
        assert!(matches!(&parts[0], ContentPart::Text(t) if t.text.is_empty()));
        match &parts[1] {
            ContentPart::Image(image) => {
                assert_eq!(STANDARD.decode(&image.data).unwrap(), bytes);
                assert_eq!(image.mime_type, "image/jpeg");
            }
            other => panic!("expected image part, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_preserve_policy_keeps_upload_type() {
        let agent = StubAgent::replying("ok");
        let state = AppState::new(agent.clone()).with_mime_policy(ImageMimePolicy::Preserve);
        let router = create_router(state, 0);
        let (status, _) = send(
            router,
            multipart_request(Some("what is this"), Some(("a.png", "image/png", &b"png"[..]))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(received_mime(&agent), "image/png");
    }

    fn received_mime(agent: &StubAgent) -> String {
        agent.received()[0]
            .image()
            .map(|i| i.mime_type.clone())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_file_field_without_name_is_not_an_image() {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"message\"\r\n\r\n\r\n\
             --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"\"\r\nContent-Type: application/octet-stream\r\n\r\n\r\n\
             --{BOUNDARY}--\r\n"
        );
        let (status, body) = send(app(StubAgent::replying("unused")), multipart_raw(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Message and image both are empty"}));
    }

    #[tokio::test]
    async fn test_agent_failure_maps_to_500() {
        let bytes: &[u8] = b"\x89PNG";
        for request in [
            multipart_request(Some("hello"), None),
            multipart_request(None, Some(("x.png", "image/png", bytes))),
        ] {
            let (status, body) = send(app(StubAgent::failing("rate limit exceeded")), request).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, json!({"error": "rate limit exceeded"}));
        }
    }

    #[tokio::test]
    async fn test_urlencoded_form() {
        let agent = StubAgent::replying("hi there");
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("message=hello+world&extra=1"))
            .unwrap();

        let (status, body) = send(app(agent.clone()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"reply": "hi there"}));
        assert_eq!(agent.received()[0].text(), "hello world");
    }

    #[tokio::test]
    async fn test_unknown_body_type_is_empty_form() {
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"message":"hi"}"#))
            .unwrap();

        let (status, body) = send(app(StubAgent::replying("unused")), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Message and image both are empty"}));
    }

    #[tokio::test]
    async fn test_malformed_multipart_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "multipart/form-data")
            .body(Body::from("garbage"))
            .unwrap();

        let (status, body) = send(app(StubAgent::replying("unused")), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid form data"));
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let agent = StubAgent::replying("unused");
        let router = create_router(AppState::new(agent.clone()), 256);
        let big = vec![0u8; 4096];
        let (status, body) = send(
            router,
            multipart_request(Some("hi"), Some(("big.jpg", "image/jpeg", big.as_slice()))),
        )
        .await;

        // The first body frame already exceeds the limit, so the form itself fails
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid form data: "));
        assert!(agent.received().is_empty());
    }

    #[tokio::test]
    async fn test_truncated_image_is_read_error() {
        // Image part never reaches its closing boundary
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"message\"\r\n\r\nlook\r\n\
             --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"cut.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n\
             partial-jpeg-data"
        );
        let agent = StubAgent::replying("unused");
        let (status, body) = send(app(agent.clone()), multipart_raw(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Failed to read image: "));
        assert!(agent.received().is_empty());
    }

    #[tokio::test]
    async fn test_unnamed_file_field_next_to_text_is_ignored() {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"message\"\r\n\r\nhello\r\n\
             --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"\"\r\nContent-Type: application/octet-stream\r\n\r\n\r\n\
             --{BOUNDARY}--\r\n"
        );
        let agent = StubAgent::replying("hi");
        let (status, body) = send(app(agent.clone()), multipart_raw(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"reply": "hi"}));
        assert_eq!(agent.received(), vec![MultimodalMessage::new("hello", None)]);
    }

    #[tokio::test]
    async fn test_upstream_error_message_reaches_client() {
        use crate::agent::AnthropicAgent;
        use crate::model::config::{AgentConfig, TlsBackend};
        use axum::routing::post as post_route;

        async fn rate_limited() -> (StatusCode, axum::Json<Value>) {
            (
                StatusCode::TOO_MANY_REQUESTS,
                axum::Json(json!({"type": "error", "error": {"type": "rate_limit_error", "message": "rate limit exceeded"}})),
            )
        }

        let upstream = Router::new().route("/v1/messages", post_route(rate_limited));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, upstream).await.unwrap();
        });

        let config = AgentConfig {
            base_url: format!("http://{}", addr),
            timeout_secs: 10,
            ..AgentConfig::default()
        };
        let agent = AnthropicAgent::new(config, "sk-test", None, TlsBackend::Rustls).unwrap();
        let router = create_router(AppState::new(Arc::new(agent)), 1024 * 1024);

        let (status, body) = send(router, multipart_request(Some("hello"), None)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "rate limit exceeded"}));
    }

    #[tokio::test]
    async fn test_identical_requests_give_identical_responses() {
        let agent = StubAgent::replying("same answer");
        let router = app(agent.clone());
        let image: &[u8] = &[1, 2, 3, 4, 5];

        let first = send(
            router.clone(),
            multipart_request(Some("again"), Some(("i.jpg", "image/jpeg", image))),
        )
        .await;
        let second = send(
            router,
            multipart_request(Some("again"), Some(("i.jpg", "image/jpeg", image))),
        )
        .await;

        assert_eq!(first, second);
        let received = agent.received();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0], received[1]);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("message=hi"))
            .unwrap();

        let response = app(StubAgent::replying("ok")).oneshot(request).await.unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }
}
