//! Boundary tests — one pipeline handoff at a time.
//!
//! Each test follows MOCK → FUNCTION → OUTPUT: script the fetcher and
//! chat mocks, run one analysis, assert on the report and the recorded
//! requests.

use std::sync::Arc;

use drivelens_common::{AnalyzerError, FileDescriptor, Warning};
use drivelens_extract::FetchError;

use crate::analyzer::Analyzer;
use crate::summarizer::Summarizer;
use crate::synthesizer::Synthesizer;
use crate::testing::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn analyzer(
    fetcher: MockFetcher,
    summary_model: Arc<MockChatModel>,
    synthesis_model: Arc<MockChatModel>,
) -> Analyzer {
    analyzer_with_budget(fetcher, summary_model, synthesis_model, 100_000)
}

fn analyzer_with_budget(
    fetcher: MockFetcher,
    summary_model: Arc<MockChatModel>,
    synthesis_model: Arc<MockChatModel>,
    context_budget_tokens: usize,
) -> Analyzer {
    Analyzer::new(
        Arc::new(fetcher),
        Summarizer::new(summary_model, 500, 30_000),
        Synthesizer::new(synthesis_model, 4000, context_budget_tokens),
    )
}

// ---------------------------------------------------------------------------
// Extract → route boundary
//
// Every descriptor ends in exactly one terminal outcome.
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_file_gets_exactly_one_terminal_outcome() {
    let fetcher = MockFetcher::new()
        .on_fetch("t1", b"some document text")
        .on_fetch("i1", &one_pixel_png())
        .on_fetch("u1", b"\x00\x01");
    let summary = Arc::new(MockChatModel::new("a summary"));
    let synthesis = Arc::new(MockChatModel::new("an answer"));

    let files = vec![
        text_file("t1", "notes.txt"),
        image_file("i1", "chart.png"),
        FileDescriptor::new("u1", "data.bin", "application/octet-stream"),
    ];

    let report = analyzer(fetcher, summary.clone(), synthesis.clone())
        .analyze(&files, "what do these say?")
        .await
        .unwrap();

    assert_eq!(report.documents_summarized, 1);
    assert_eq!(report.images_attached, 1);
    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(
        &report.warnings[0],
        Warning::Unsupported { file_name, .. } if file_name == "data.bin"
    ));
}

#[tokio::test]
async fn image_bytes_pass_through_untouched() {
    let png = one_pixel_png();
    let fetcher = MockFetcher::new().on_fetch("i1", &png);
    let summary = Arc::new(MockChatModel::new("unused"));
    let synthesis = Arc::new(MockChatModel::new("an answer"));

    analyzer(fetcher, summary, synthesis.clone())
        .analyze(&[image_file("i1", "photo.png")], "describe the photo")
        .await
        .unwrap();

    assert_eq!(synthesis.request_images(0), vec![png]);
}

// ---------------------------------------------------------------------------
// Summarize boundary
// ---------------------------------------------------------------------------

#[tokio::test]
async fn summary_prompt_names_the_file_and_carries_its_text() {
    let fetcher = MockFetcher::new().on_fetch("d1", b"Hello world");
    let summary = Arc::new(MockChatModel::new("a summary"));
    let synthesis = Arc::new(MockChatModel::new("an answer"));

    analyzer(fetcher, summary.clone(), synthesis)
        .analyze(&[text_file("d1", "doc.txt")], "what is this?")
        .await
        .unwrap();

    let prompt = summary.request_text(0);
    assert!(prompt.contains("doc.txt"));
    assert!(prompt.contains("Hello world"));
}

#[tokio::test]
async fn one_failed_summary_does_not_stop_the_batch() {
    let fetcher = MockFetcher::new()
        .on_fetch("good", b"fine content")
        .on_fetch("bad", b"poison content");
    let summary = Arc::new(MockChatModel::new("a summary").failing_when("bad.txt"));
    let synthesis = Arc::new(MockChatModel::new("an answer"));

    let files = vec![text_file("bad", "bad.txt"), text_file("good", "good.txt")];
    let report = analyzer(fetcher, summary.clone(), synthesis.clone())
        .analyze(&files, "summarize everything")
        .await
        .unwrap();

    assert_eq!(summary.request_count(), 2, "both files were attempted");
    assert_eq!(synthesis.request_count(), 1, "synthesis still ran");
    assert_eq!(report.documents_summarized, 1);
    assert!(report.warnings.iter().any(|w| matches!(
        w,
        Warning::SummarizeFailed { file_name, .. } if file_name == "bad.txt"
    )));
}

// ---------------------------------------------------------------------------
// Synthesize boundary
// ---------------------------------------------------------------------------

#[tokio::test]
async fn synthesis_payload_keeps_selection_order_and_appends_the_question() {
    let fetcher = MockFetcher::new()
        .on_fetch("d1", b"first doc")
        .on_fetch("d2", b"second doc")
        .on_fetch("i1", &one_pixel_png());
    let summary = Arc::new(
        MockChatModel::new("fallback")
            .respond_when("alpha.txt", "SUMMARY-ONE")
            .respond_when("beta.txt", "SUMMARY-TWO"),
    );
    let synthesis = Arc::new(MockChatModel::new("an answer"));

    let files = vec![
        text_file("d1", "alpha.txt"),
        text_file("d2", "beta.txt"),
        image_file("i1", "chart.png"),
    ];
    analyzer(fetcher, summary, synthesis.clone())
        .analyze(&files, "WHAT-IS-THE-TREND")
        .await
        .unwrap();

    let payload = synthesis.request_text(0);
    let s1 = payload.find("SUMMARY-ONE").expect("first summary present");
    let s2 = payload.find("SUMMARY-TWO").expect("second summary present");
    let q = payload.find("WHAT-IS-THE-TREND").expect("question present");
    assert!(s1 < s2, "summaries keep selection order");
    assert!(s2 < q, "question comes after the summaries");
    assert_eq!(synthesis.request_images(0).len(), 1);
}

#[tokio::test]
async fn all_unsupported_files_skip_the_model_entirely() {
    let fetcher = MockFetcher::new()
        .on_fetch("u1", b"\x00")
        .fail_fetch("u2", FetchError::Provider("backend exploded".into()));
    let summary = Arc::new(MockChatModel::new("unused"));
    let synthesis = Arc::new(MockChatModel::new("unused"));

    let files = vec![
        FileDescriptor::new("u1", "a.bin", "application/octet-stream"),
        FileDescriptor::new("u2", "b.pdf", "application/pdf"),
    ];
    let result = analyzer(fetcher, summary.clone(), synthesis.clone())
        .analyze(&files, "anything?")
        .await;

    assert!(matches!(result, Err(AnalyzerError::NoSupportedFiles)));
    assert_eq!(summary.request_count(), 0);
    assert_eq!(synthesis.request_count(), 0);
}

#[tokio::test]
async fn oversized_payload_is_trimmed_with_a_warning() {
    let fetcher = MockFetcher::new()
        .on_fetch("d1", b"first doc")
        .on_fetch("d2", b"second doc");
    let long_summary = "w".repeat(4000); // ~1000 tokens each
    let summary = Arc::new(MockChatModel::new(&long_summary));
    let synthesis = Arc::new(MockChatModel::new("an answer"));

    // Budget fits roughly one summary, not two.
    let report = analyzer_with_budget(fetcher, summary, synthesis.clone(), 1200)
        .analyze(
            &[text_file("d1", "alpha.txt"), text_file("d2", "beta.txt")],
            "what happened?",
        )
        .await
        .unwrap();

    assert!(report.warnings.iter().any(|w| matches!(
        w,
        Warning::Truncated { file_names } if file_names.contains(&"beta.txt".to_string())
    )));
    assert_eq!(synthesis.request_count(), 1, "the trimmed request still went out");
}

#[tokio::test]
async fn failed_summaries_alone_do_not_reach_synthesis() {
    // Extraction works, every summarization fails: nothing usable remains.
    let fetcher = MockFetcher::new().on_fetch("d1", b"content");
    let summary = Arc::new(MockChatModel::new("unused").failing_when("doc.txt"));
    let synthesis = Arc::new(MockChatModel::new("unused"));

    let result = analyzer(fetcher, summary, synthesis.clone())
        .analyze(&[text_file("d1", "doc.txt")], "anything?")
        .await;

    assert!(matches!(result, Err(AnalyzerError::NoSupportedFiles)));
    assert_eq!(synthesis.request_count(), 0);
}
