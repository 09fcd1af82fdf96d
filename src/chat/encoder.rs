//! Payload encoding: form fields to a multimodal message

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::model::config::ImageMimePolicy;

use super::error::ChatError;
use super::types::{ImageEncoding, ImagePart, ImageUpload, IncomingRequest, MultimodalMessage};

/// MIME type reported for images unless the policy says otherwise
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

const OCTET_STREAM: &str = "application/octet-stream";

/// Builds [`MultimodalMessage`]s from validated requests
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadEncoder {
    mime_policy: ImageMimePolicy,
}

impl PayloadEncoder {
    pub fn new(mime_policy: ImageMimePolicy) -> Self {
        Self { mime_policy }
    }

    /// Encode the request into a message
    ///
    /// The text is copied verbatim. Image bytes are read once and base64
    /// encoded; a read failure aborts the request.
    pub fn encode(&self, request: IncomingRequest) -> Result<MultimodalMessage, ChatError> {
        let image = match &request.image {
            Some(upload) => Some(self.encode_image(upload)?),
            None => None,
        };
        Ok(MultimodalMessage::new(request.message, image))
    }

    fn encode_image(&self, upload: &ImageUpload) -> Result<ImagePart, ChatError> {
        let bytes = upload.read()?;
        Ok(ImagePart {
            encoding: ImageEncoding::Base64,
            data: STANDARD.encode(&bytes),
            mime_type: self.mime_type_for(upload),
        })
    }

    fn mime_type_for(&self, upload: &ImageUpload) -> String {
        match self.mime_policy {
            ImageMimePolicy::ForceJpeg => DEFAULT_IMAGE_MIME.to_string(),
            ImageMimePolicy::Preserve => upload
                .content_type
                .as_deref()
                .map(str::trim)
                .filter(|ct| !ct.is_empty() && !ct.eq_ignore_ascii_case(OCTET_STREAM))
                .map(str::to_string)
                .or_else(|| guess_image_mime(upload.file_name.as_deref()?))
                .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string()),
        }
    }
}

/// Guess an image MIME type from a file name
fn guess_image_mime(file_name: &str) -> Option<String> {
    mime_guess::from_path(file_name)
        .iter()
        .find(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .map(|mime| mime.essence_str().to_string())
}
