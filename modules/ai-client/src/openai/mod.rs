mod client;
pub(crate) mod types;

use async_trait::async_trait;

use crate::error::{AiError, Result};
use crate::traits::{ChatModel, ChatRequest};

use client::OpenAiClient;
use types::{uses_max_completion_tokens, WireMessage, WireRequest};

// =============================================================================
// OpenAi Model
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    model: String,
    base_url: Option<String>,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AiError::Config("OPENAI_API_KEY environment variable not set".into()))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }
}

#[async_trait]
impl ChatModel for OpenAi {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<String> {
        let mut messages: Vec<WireMessage> = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(WireMessage::system(system.clone()));
        }
        messages.extend(request.messages.iter().map(WireMessage::from));

        let wire = if uses_max_completion_tokens(&self.model) {
            WireRequest {
                model: self.model.clone(),
                messages,
                max_tokens: None,
                max_completion_tokens: Some(request.max_tokens),
                temperature: None,
            }
        } else {
            WireRequest {
                model: self.model.clone(),
                messages,
                max_tokens: Some(request.max_tokens),
                max_completion_tokens: None,
                temperature: request.temperature,
            }
        };

        let response = self.client().chat(&wire).await?;
        response.text().ok_or(AiError::Empty)
    }
}
