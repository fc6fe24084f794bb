use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- File types ---

/// One entry from the Drive listing. Immutable for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Opaque provider file id.
    pub id: String,
    /// Display name shown in warnings and prompts.
    pub name: String,
    /// Raw MIME type string as reported by the listing.
    pub mime_type: String,
}

impl FileDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Terminal extraction outcome for one file. Every descriptor in a run
/// produces exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPayload {
    Text(String),
    Image(Vec<u8>),
    Unsupported(String),
}

impl ContentPayload {
    pub fn is_text(&self) -> bool {
        matches!(self, ContentPayload::Text(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self, ContentPayload::Image(_))
    }
}

// --- Summarization ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Summary(String),
    Failed(String),
}

/// Pairs a file's display name with its summarization outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub file_name: String,
    pub outcome: SummaryOutcome,
}

impl SummaryResult {
    pub fn ok(file_name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            outcome: SummaryOutcome::Summary(summary.into()),
        }
    }

    pub fn failed(file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            outcome: SummaryOutcome::Failed(reason.into()),
        }
    }

    pub fn summary(&self) -> Option<&str> {
        match &self.outcome {
            SummaryOutcome::Summary(s) => Some(s),
            SummaryOutcome::Failed(_) => None,
        }
    }
}

// --- Aggregation ---

/// Accumulated state of one orchestration run, handed to the synthesizer.
/// Summaries are kept in file-selection order, images in collection order.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub summaries: Vec<SummaryResult>,
    pub images: Vec<(String, Vec<u8>)>,
    pub question: String,
}

impl AnalysisRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            summaries: Vec::new(),
            images: Vec::new(),
            question: question.into(),
        }
    }

    /// True when at least one summary succeeded or any image was collected.
    pub fn has_content(&self) -> bool {
        !self.images.is_empty() || self.summaries.iter().any(|s| s.summary().is_some())
    }
}

// --- Warnings ---

/// Per-file problems collected during a run. These never abort the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// File type or export path not handled.
    Unsupported { file_name: String, reason: String },
    /// The summarization request for this file failed.
    SummarizeFailed { file_name: String, reason: String },
    /// The synthesis payload exceeded the context budget and these
    /// documents were trimmed or dropped.
    Truncated { file_names: Vec<String> },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::Unsupported { file_name, reason } => {
                write!(f, "skipped {file_name}: {reason}")
            }
            Warning::SummarizeFailed { file_name, reason } => {
                write!(f, "could not summarize {file_name}: {reason}")
            }
            Warning::Truncated { file_names } => {
                write!(f, "trimmed to fit context budget: {}", file_names.join(", "))
            }
        }
    }
}

// --- Report ---

/// Final result of one orchestration run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub answer: String,
    pub warnings: Vec<Warning>,
    pub documents_summarized: usize,
    pub images_attached: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_without_content_reports_empty() {
        let mut request = AnalysisRequest::new("what is this?");
        assert!(!request.has_content());

        request
            .summaries
            .push(SummaryResult::failed("a.bin", "unsupported"));
        assert!(!request.has_content(), "failed summaries are not content");

        request.images.push(("photo.png".into(), vec![1, 2, 3]));
        assert!(request.has_content());
    }

    #[test]
    fn summary_accessor_hides_failures() {
        assert_eq!(SummaryResult::ok("a", "text").summary(), Some("text"));
        assert_eq!(SummaryResult::failed("a", "boom").summary(), None);
    }
}
