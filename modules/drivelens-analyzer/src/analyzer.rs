//! The orchestrator: extract → summarize → synthesize, strictly
//! sequential, collecting per-file warnings instead of aborting.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use drivelens_common::{
    AnalysisReport, AnalysisRequest, AnalyzerError, ContentPayload, FileDescriptor, SummaryResult,
    Warning,
};
use drivelens_extract::{extract, FileFetcher};

use crate::summarizer::Summarizer;
use crate::synthesizer::Synthesizer;

pub struct Analyzer {
    fetcher: Arc<dyn FileFetcher>,
    summarizer: Summarizer,
    synthesizer: Synthesizer,
}

impl Analyzer {
    pub fn new(fetcher: Arc<dyn FileFetcher>, summarizer: Summarizer, synthesizer: Synthesizer) -> Self {
        Self {
            fetcher,
            summarizer,
            synthesizer,
        }
    }

    /// Run one analysis over the selected files. Every file ends in
    /// exactly one of: a summary, an image attachment, or a warning.
    /// Only an all-failed batch is fatal.
    pub async fn analyze(
        &self,
        files: &[FileDescriptor],
        question: &str,
    ) -> Result<AnalysisReport, AnalyzerError> {
        let run_id = Uuid::new_v4();
        let mut request = AnalysisRequest::new(question);
        let mut warnings: Vec<Warning> = Vec::new();
        let mut texts: Vec<(String, String)> = Vec::new();

        // Extract phase: selection order, one terminal payload per file.
        info!(%run_id, files = files.len(), "Extract phase");
        for file in files {
            match extract(self.fetcher.as_ref(), file).await {
                ContentPayload::Text(text) => texts.push((file.name.clone(), text)),
                ContentPayload::Image(bytes) => request.images.push((file.name.clone(), bytes)),
                ContentPayload::Unsupported(reason) => {
                    warn!(%run_id, file = %file.name, %reason, "Skipping unsupported file");
                    warnings.push(Warning::Unsupported {
                        file_name: file.name.clone(),
                        reason,
                    });
                }
            }
        }

        // Summarize phase: a failed file never stops its neighbors.
        info!(%run_id, documents = texts.len(), "Summarize phase");
        for (name, text) in &texts {
            match self.summarizer.summarize(name, text).await {
                Ok(summary) => request.summaries.push(SummaryResult::ok(name, summary)),
                Err(err) => {
                    warn!(%run_id, file = %name, error = %err, "Summarization failed");
                    warnings.push(Warning::SummarizeFailed {
                        file_name: name.clone(),
                        reason: err.to_string(),
                    });
                    request.summaries.push(SummaryResult::failed(name, err.to_string()));
                }
            }
        }

        // Synthesize phase: skipped entirely when nothing usable remains.
        if !request.has_content() {
            return Err(AnalyzerError::NoSupportedFiles);
        }

        let documents_summarized = request.summaries.iter().filter(|s| s.summary().is_some()).count();
        info!(
            %run_id,
            summaries = documents_summarized,
            images = request.images.len(),
            "Synthesize phase"
        );
        let (answer, synthesis_warnings) = self
            .synthesizer
            .synthesize(&request)
            .await
            .map_err(|e| AnalyzerError::Synthesis(e.to_string()))?;
        warnings.extend(synthesis_warnings);

        Ok(AnalysisReport {
            run_id,
            answer,
            warnings,
            documents_summarized,
            images_attached: request.images.len(),
        })
    }
}
