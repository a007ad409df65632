//! Chat-completion wire types.
//!
//! We speak the OpenAI chat-completions schema directly, so the payload and
//! response shapes live here as plain serde types.

use serde::{Deserialize, Serialize};

use crate::{data_url::base64_data_url, error::OcrError};

/// MIME type of the compressed image we embed.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Detail hint telling the model to use full image resolution.
pub const IMAGE_DETAIL: &str = "high";

/// A chat-completion request body.
#[derive(Clone, Debug, Serialize)]
pub struct ChatCompletionPayload {
    /// The model to use.
    pub model: String,

    /// An upper limit on the number of tokens to generate. Omitted when the
    /// target API does not want one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// System prompt followed by the user message carrying the image.
    pub messages: Vec<ChatMessage>,
}

/// One chat message.
#[derive(Clone, Debug, Serialize)]
pub struct ChatMessage {
    /// "system" or "user".
    pub role: String,

    /// Either plain text or a list of content blocks.
    pub content: MessageContent,
}

/// Message content, either plain text or multimodal blocks.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content.
    Text(String),

    /// Multimodal content blocks.
    Blocks(Vec<ContentBlock>),
}

/// A single multimodal content block.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// An embedded image.
    ImageUrl {
        /// The image reference.
        image_url: ImageUrl,
    },
}

/// An image reference inside a content block.
#[derive(Clone, Debug, Serialize)]
pub struct ImageUrl {
    /// A `data:` URL embedding the image.
    pub url: String,

    /// Detail/fidelity hint for the model.
    pub detail: String,
}

/// Build the chat-completion payload for one recognition request.
///
/// Deterministic: identical inputs always produce an identical payload.
pub fn build_payload(
    compressed_base64: &str,
    system_prompt: &str,
    model: &str,
    max_tokens: Option<u32>,
) -> ChatCompletionPayload {
    ChatCompletionPayload {
        model: model.to_string(),
        max_tokens,
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: MessageContent::Text(system_prompt.to_string()),
            },
            ChatMessage {
                role: "user".to_string(),
                content: MessageContent::Blocks(vec![ContentBlock::ImageUrl {
                    image_url: ImageUrl {
                        url: base64_data_url(IMAGE_MIME_TYPE, compressed_base64),
                        detail: IMAGE_DETAIL.to_string(),
                    },
                }]),
            },
        ],
    }
}

/// A chat-completion response body. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    /// Generated choices.
    pub choices: Vec<Choice>,
}

/// One generated choice.
#[derive(Debug, Deserialize)]
pub struct Choice {
    /// The generated message.
    pub message: ResponseMessage,
}

/// The message inside a choice.
#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    /// Generated text, if any.
    pub content: Option<String>,
}

/// Pull the recognized text out of a successful response body.
///
/// The empty string is a valid result; a missing `choices[0].message.content`
/// is not.
pub fn extract_text(data: serde_json::Value) -> Result<String, OcrError> {
    let response = serde_json::from_value::<ChatCompletionResponse>(data)
        .map_err(|_| OcrError::MalformedResponse)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(OcrError::MalformedResponse)
}
