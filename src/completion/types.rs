use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// Image payload as supplied by the caller; forwarded without re-encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageSource {
    pub fn base64(media_type: &str, data: &str) -> Self {
        Self {
            kind: "base64".to_string(),
            media_type: Some(media_type.to_string()),
            data: Some(data.to_string()),
            url: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    Image { source: ImageSource },
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

/// Outgoing request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub messages: Vec<Message>,
}

impl CompletionRequest {
    /// Single user turn carrying the image followed by a text prompt.
    pub fn vision(
        model: &str,
        image: &ImageSource,
        prompt: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            model: model.to_string(),
            max_tokens,
            temperature,
            messages: vec![Message {
                role: Role::User,
                content: vec![
                    ContentPart::Image {
                        source: image.clone(),
                    },
                    ContentPart::Text {
                        text: prompt.into(),
                    },
                ],
            }],
        }
    }

    /// Text of the last text part of the first message.
    pub fn prompt(&self) -> Option<&str> {
        self.messages
            .first()?
            .content
            .iter()
            .rev()
            .find_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::Image { .. } => None,
            })
    }
}

/// Response envelope. `content` blocks are kept raw so they can be forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub content: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CompletionResponse {
    /// Response with a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![serde_json::json!({ "type": "text", "text": text.into() })],
            extra: Map::new(),
        }
    }

    /// `text` of the first content block, if that block has one.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first()?.get("text")?.as_str()
    }
}
