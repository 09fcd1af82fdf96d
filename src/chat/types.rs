//! Chat request, message and response types

use bytes::Bytes;
use serde::Serialize;

use super::error::ChatError;

// === Incoming Request ===

/// Uploaded image as received from the form
///
/// Reading the body may already have failed while the form was parsed; that
/// failure is kept here and surfaces when the encoder reads the bytes.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    body: Result<Bytes, String>,
    /// Content-Type sent with the file part
    pub content_type: Option<String>,
    /// File name sent with the file part
    pub file_name: Option<String>,
}

impl ImageUpload {
    /// Create an upload from fully read bytes
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            body: Ok(bytes.into()),
            content_type: None,
            file_name: None,
        }
    }

    /// Create an upload whose body could not be read
    pub fn unreadable(reason: impl Into<String>) -> Self {
        Self {
            body: Err(reason.into()),
            content_type: None,
            file_name: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Take the raw image bytes
    pub fn read(&self) -> Result<Bytes, ChatError> {
        self.body.clone().map_err(ChatError::ImageRead)
    }
}

/// One `/chat` call: the text field plus an optional image
#[derive(Debug, Clone, Default)]
pub struct IncomingRequest {
    pub message: String,
    pub image: Option<ImageUpload>,
}

impl IncomingRequest {
    pub fn new(message: impl Into<String>, image: Option<ImageUpload>) -> Self {
        Self {
            message: message.into(),
            image,
        }
    }
}

// === Multimodal Message ===

/// Encoding of inline image data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    Base64,
}

/// Text content part
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextPart {
    pub text: String,
}

/// Inline image content part
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePart {
    #[serde(rename = "source_type")]
    pub encoding: ImageEncoding,
    pub data: String,
    pub mime_type: String,
}

/// One typed unit of a multimodal message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text(TextPart),
    Image(ImagePart),
}

/// Ordered content parts sent to the agent in one call
///
/// Always holds exactly one text part, followed by at most one image part.
/// There is no way to modify a message once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MultimodalMessage {
    parts: Vec<ContentPart>,
}

impl MultimodalMessage {
    pub fn new(text: impl Into<String>, image: Option<ImagePart>) -> Self {
        let mut parts = vec![ContentPart::Text(TextPart { text: text.into() })];
        if let Some(image) = image {
            parts.push(ContentPart::Image(image));
        }
        Self { parts }
    }

    pub fn parts(&self) -> &[ContentPart] {
        &self.parts
    }

    /// The user's text (possibly empty)
    pub fn text(&self) -> &str {
        self.parts
            .iter()
            .find_map(|part| match part {
                ContentPart::Text(text) => Some(text.text.as_str()),
                ContentPart::Image(_) => None,
            })
            .unwrap_or_default()
    }

    pub fn image(&self) -> Option<&ImagePart> {
        self.parts.iter().find_map(|part| match part {
            ContentPart::Image(image) => Some(image),
            ContentPart::Text(_) => None,
        })
    }
}

// === Agent Outcome ===

/// Result of a single agent call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentOutcome {
    Success { reply: String },
    Failure { reason: String },
}

// === Response Bodies ===

/// 200 response body
#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    pub reply: String,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
