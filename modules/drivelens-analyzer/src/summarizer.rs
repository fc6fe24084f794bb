//! Per-file summarization: one bounded request per extracted document.

use std::sync::Arc;

use tracing::debug;

use ai_client::error::Result;
use ai_client::{ChatModel, ChatRequest, Message};
use drivelens_common::budget::truncate_to_char_boundary;

const SUMMARY_SYSTEM_PROMPT: &str =
    "You summarize documents. Capture the key points faithfully and concisely; \
     do not speculate beyond the text you are given.";

pub struct Summarizer {
    model: Arc<dyn ChatModel>,
    max_output_tokens: u32,
    input_budget_bytes: usize,
}

impl Summarizer {
    pub fn new(model: Arc<dyn ChatModel>, max_output_tokens: u32, input_budget_bytes: usize) -> Self {
        Self {
            model,
            max_output_tokens,
            input_budget_bytes,
        }
    }

    /// Summarize one document. The document text is truncated to the
    /// per-request input budget at a character boundary.
    pub async fn summarize(&self, file_name: &str, text: &str) -> Result<String> {
        let text = truncate_to_char_boundary(text, self.input_budget_bytes);
        let prompt = format!(
            "Summarize the key points of the document named '{file_name}'.\n\n---\n\n{text}"
        );

        debug!(file = file_name, bytes = text.len(), model = self.model.model(), "Summarizing");

        let request = ChatRequest::new()
            .system(SUMMARY_SYSTEM_PROMPT)
            .message(Message::user(prompt))
            .max_tokens(self.max_output_tokens)
            .temperature(0.0);

        self.model.chat(request).await
    }
}
