use async_trait::async_trait;

use crate::error::Result;

// =============================================================================
// Message Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

/// One piece of a message. Vendors encode text and inline images
/// differently on the wire; this is the neutral form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    Image { media_type: String, data: Vec<u8> },
}

impl ContentPart {
    pub fn text(content: impl Into<String>) -> Self {
        ContentPart::Text(content.into())
    }

    pub fn image(media_type: impl Into<String>, data: Vec<u8>) -> Self {
        ContentPart::Image {
            media_type: media_type.into(),
            data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub role: MessageRole,
    pub parts: Vec<ContentPart>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            parts: vec![ContentPart::text(content)],
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: MessageRole::User,
            parts,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            parts: vec![ContentPart::text(content)],
        }
    }
}

// =============================================================================
// Chat Request
// =============================================================================

/// Vendor-neutral chat request. Adapters translate this into the
/// provider wire format.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: Option<String>,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl ChatRequest {
    pub fn new() -> Self {
        Self {
            system: None,
            messages: Vec::new(),
            max_tokens: 4096,
            temperature: None,
        }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl Default for ChatRequest {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ChatModel Trait
// =============================================================================

/// One chat-capable model endpoint. `Claude` and `OpenAi` both implement
/// this; orchestration code holds `Arc<dyn ChatModel>` and never sees a
/// vendor wire format.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// The model id requests are sent to.
    fn model(&self) -> &str;

    /// Send one request, returning the model's text reply.
    async fn chat(&self, request: ChatRequest) -> Result<String>;
}
