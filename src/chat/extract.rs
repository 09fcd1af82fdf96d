//! Form extraction for `POST /chat`
//!
//! Accepts `multipart/form-data` (text plus optional file) and
//! `application/x-www-form-urlencoded` (text only). Any other body is read as
//! an empty form.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header,
    Form,
};
use serde::Deserialize;

use super::error::ChatError;
use super::types::{ImageUpload, IncomingRequest};

const MESSAGE_FIELD: &str = "message";
const IMAGE_FIELD: &str = "image";

/// URL-encoded form body
#[derive(Debug, Deserialize)]
struct ChatForm {
    #[serde(default)]
    message: String,
}

/// Read the `/chat` form fields out of a request
pub async fn read_incoming(request: Request) -> Result<IncomingRequest, ChatError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ChatError::InvalidForm(e.body_text()))?;
        read_multipart(multipart).await
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(form) = Form::<ChatForm>::from_request(request, &())
            .await
            .map_err(|e| ChatError::InvalidForm(e.body_text()))?;
        Ok(IncomingRequest::new(form.message, None))
    } else {
        tracing::debug!(content_type = %content_type, "Unsupported body type, reading as empty form");
        Ok(IncomingRequest::default())
    }
}

/// Walk the multipart fields
///
/// The first `message` and the first `image` field win. A file field without
/// a file name is what browsers send for an untouched file input, so it does
/// not count as an attachment.
async fn read_multipart(mut multipart: Multipart) -> Result<IncomingRequest, ChatError> {
    let mut message: Option<String> = None;
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ChatError::InvalidForm(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(MESSAGE_FIELD) if message.is_none() => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ChatError::InvalidForm(e.body_text()))?;
                message = Some(text);
            }
            Some(IMAGE_FIELD) if image.is_none() => {
                let Some(file_name) = field.file_name().filter(|n| !n.is_empty()).map(str::to_string)
                else {
                    continue;
                };
                let content_type = field.content_type().map(str::to_string);

                let (upload, failed) = match field.bytes().await {
                    Ok(bytes) => (ImageUpload::new(bytes), false),
                    Err(e) => (ImageUpload::unreadable(e.body_text()), true),
                };
                let upload = upload.with_file_name(file_name);
                image = Some(match content_type {
                    Some(ct) => upload.with_content_type(ct),
                    None => upload,
                });

                // The stream is unusable after a failed read
                if failed {
                    break;
                }
            }
            _ => {}
        }
    }

    Ok(IncomingRequest::new(message.unwrap_or_default(), image))
}
