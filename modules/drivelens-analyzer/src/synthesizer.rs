//! Synthesis: one multimodal request combining every summary and image
//! with the user's question.

use std::sync::Arc;

use tracing::{debug, info};

use ai_client::error::Result;
use ai_client::{ChatModel, ChatRequest, ContentPart, Message};
use drivelens_common::budget::{estimate_tokens, truncate_to_char_boundary, IMAGE_TOKEN_COST};
use drivelens_common::{AnalysisRequest, Warning};

const SYNTHESIS_SYSTEM_PROMPT: &str =
    "Answer the user's question using the document summaries and images provided. \
     Cite documents by name when the answer draws on them. If the material does \
     not answer the question, say so.";

/// A truncated section shorter than this many tokens is dropped instead.
const MIN_SECTION_TOKENS: usize = 16;

pub struct Synthesizer {
    model: Arc<dyn ChatModel>,
    max_output_tokens: u32,
    context_budget_tokens: usize,
}

impl Synthesizer {
    pub fn new(
        model: Arc<dyn ChatModel>,
        max_output_tokens: u32,
        context_budget_tokens: usize,
    ) -> Self {
        Self {
            model,
            max_output_tokens,
            context_budget_tokens,
        }
    }

    /// Build and send the synthesis request. Returns the answer plus any
    /// warnings raised while fitting the payload to the context budget.
    pub async fn synthesize(&self, request: &AnalysisRequest) -> Result<(String, Vec<Warning>)> {
        let sections: Vec<(String, String)> = request
            .summaries
            .iter()
            .filter_map(|result| {
                result.summary().map(|summary| {
                    (
                        result.file_name.clone(),
                        format!("--- DOCUMENT: {} ---\n{}", result.file_name, summary),
                    )
                })
            })
            .collect();

        // Images and the question are never trimmed; summaries absorb the
        // entire shortfall.
        let reserved = estimate_tokens(&request.question)
            + request.images.len() * IMAGE_TOKEN_COST
            + estimate_tokens(SYNTHESIS_SYSTEM_PROMPT);
        let section_budget = self.context_budget_tokens.saturating_sub(reserved);

        let (kept, trimmed) = fit_sections(sections, section_budget);
        let mut warnings = Vec::new();
        if !trimmed.is_empty() {
            info!(trimmed = trimmed.len(), "Synthesis payload exceeded context budget");
            warnings.push(Warning::Truncated {
                file_names: trimmed,
            });
        }

        let mut parts = Vec::with_capacity(kept.len() + request.images.len() + 1);
        if !kept.is_empty() {
            parts.push(ContentPart::text(kept.join("\n\n")));
        }
        parts.push(ContentPart::text(request.question.clone()));
        for (name, bytes) in &request.images {
            debug!(image = %name, bytes = bytes.len(), "Attaching image");
            parts.push(ContentPart::image(sniff_media_type(bytes), bytes.clone()));
        }

        let chat = ChatRequest::new()
            .system(SYNTHESIS_SYSTEM_PROMPT)
            .message(Message::user_parts(parts))
            .max_tokens(self.max_output_tokens);

        let answer = self.model.chat(chat).await?;
        Ok((answer, warnings))
    }
}

/// Keep sections in order until the token budget runs out. The section
/// that crosses the budget is truncated (or dropped when the remainder
/// would be negligible); everything after it is dropped. Returns the
/// kept section texts and the names of trimmed/dropped documents.
fn fit_sections(sections: Vec<(String, String)>, budget_tokens: usize) -> (Vec<String>, Vec<String>) {
    let mut kept = Vec::new();
    let mut trimmed = Vec::new();
    let mut spent = 0usize;
    let mut exhausted = false;

    for (name, text) in sections {
        if exhausted {
            trimmed.push(name);
            continue;
        }

        let cost = estimate_tokens(&text);
        if spent + cost <= budget_tokens {
            spent += cost;
            kept.push(text);
            continue;
        }

        let remaining = budget_tokens.saturating_sub(spent);
        if remaining >= MIN_SECTION_TOKENS {
            kept.push(truncate_to_char_boundary(&text, remaining * 4).to_string());
        }
        trimmed.push(name);
        exhausted = true;
    }

    (kept, trimmed)
}

/// Best-effort media type for an inline image from its magic bytes.
fn sniff_media_type(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xff, 0xd8, 0xff, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/jpeg",
    }
}
