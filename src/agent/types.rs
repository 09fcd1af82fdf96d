//! Anthropic Messages API wire types

use serde::{Deserialize, Serialize};

use crate::chat::types::{ContentPart, MultimodalMessage};

/// Messages request body
#[derive(Debug, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<Message>,
}

/// Message
#[derive(Debug, Serialize)]
pub struct Message {
    pub role: String,
    pub content: Vec<ContentBlock>,
}

/// Request content block
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
}

/// Image data source
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ImageSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub media_type: String,
    pub data: String,
}

impl Message {
    /// Build the single user turn for a multimodal message
    ///
    /// Blank text parts (empty or whitespace only) are dropped, the API
    /// rejects blank text blocks.
    pub fn user(message: &MultimodalMessage) -> Self {
        let content = message
            .parts()
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text(text) if text.text.trim().is_empty() => None,
                ContentPart::Text(text) => Some(ContentBlock::Text {
                    text: text.text.clone(),
                }),
                ContentPart::Image(image) => Some(ContentBlock::Image {
                    source: ImageSource {
                        source_type: "base64".to_string(),
                        media_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                }),
            })
            .collect();

        Self {
            role: "user".to_string(),
            content,
        }
    }
}

/// Messages response body
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ResponseBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Response content block
#[derive(Debug, Deserialize)]
pub struct ResponseBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessagesResponse {
    /// Concatenate all text blocks, ignoring tool use and thinking blocks
    pub fn reply_text(&self) -> String {
        self.content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect()
    }
}
