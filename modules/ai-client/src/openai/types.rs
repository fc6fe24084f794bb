use serde::{Deserialize, Serialize};

use crate::traits::{ContentPart, Message, MessageRole};

// =============================================================================
// Messages
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct WireMessage {
    pub role: Role,
    pub content: WireContent,
}

/// OpenAI accepts either a bare string or an array of typed parts.
/// Text-only messages stay in the string form.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub(crate) enum WireContent {
    Text(String),
    Parts(Vec<WirePart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub(crate) enum WirePart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
}

impl ImageUrl {
    /// Inline image as a `data:` URL, the only form that works without
    /// hosting the bytes somewhere fetchable.
    pub fn data_url(media_type: &str, data: &[u8]) -> Self {
        use base64::Engine;

        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        Self {
            url: format!("data:{media_type};base64,{encoded}"),
        }
    }
}

impl WireMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: WireContent::Text(content.into()),
        }
    }
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            MessageRole::User => Role::User,
            MessageRole::Assistant => Role::Assistant,
        };

        // Single text part collapses to the plain string form.
        let content = match message.parts.as_slice() {
            [ContentPart::Text(text)] => WireContent::Text(text.clone()),
            parts => WireContent::Parts(
                parts
                    .iter()
                    .map(|part| match part {
                        ContentPart::Text(text) => WirePart::Text { text: text.clone() },
                        ContentPart::Image { media_type, data } => WirePart::ImageUrl {
                            image_url: ImageUrl::data_url(media_type, data),
                        },
                    })
                    .collect(),
            ),
        };

        Self { role, content }
    }
}

// =============================================================================
// Chat Request
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub(crate) struct WireRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Newer model families renamed the output cap and dropped temperature.
pub(crate) fn uses_max_completion_tokens(model: &str) -> bool {
    model.starts_with("o1") || model.starts_with("o3") || model.starts_with("gpt-5")
}

// =============================================================================
// Chat Response
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResponseMessage {
    pub content: Option<String>,
}

impl WireResponse {
    pub fn text(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_text_part_stays_a_string() {
        let wire = WireMessage::from(&Message::user("hello"));
        assert!(matches!(wire.content, WireContent::Text(ref t) if t == "hello"));
    }

    #[test]
    fn image_parts_become_data_urls() {
        let message = Message::user_parts(vec![
            ContentPart::text("describe this"),
            ContentPart::image("image/jpeg", vec![1, 2, 3]),
        ]);
        let wire = WireMessage::from(&message);

        let WireContent::Parts(parts) = wire.content else {
            panic!("expected parts form");
        };
        assert_eq!(parts.len(), 2);
        match &parts[1] {
            WirePart::ImageUrl { image_url } => {
                assert!(image_url.url.starts_with("data:image/jpeg;base64,"));
            }
            other => panic!("expected image part, got {other:?}"),
        }
    }

    #[test]
    fn token_cap_field_tracks_model_family() {
        assert!(uses_max_completion_tokens("gpt-5-mini"));
        assert!(uses_max_completion_tokens("o3"));
        assert!(!uses_max_completion_tokens("gpt-4o"));
    }
}
