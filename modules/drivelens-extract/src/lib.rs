//! Content extraction: one terminal `ContentPayload` per file.
//!
//! Dispatch is by MIME-type substring with a fixed precedence; files the
//! provider stores in its native formats fall back to a plain-text (or
//! CSV) export when the direct download is refused. Every text-decode
//! site is lenient — bad encoding degrades the text, never the batch.

pub mod image;
pub mod office;
pub mod pdf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use drive_client::{DriveClient, DriveError, Session};
use drivelens_common::{ContentPayload, FileDescriptor};

// ---------------------------------------------------------------------------
// FileFetcher — the byte-fetch capability
// ---------------------------------------------------------------------------

/// Error class a fetcher reports. Only the access/format class triggers
/// the export fallback; everything else marks the file unsupported.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("access/format error: {0}")]
    AccessOrFormat(String),

    #[error("provider error: {0}")]
    Provider(String),
}

/// Byte-fetch capability over the selected storage provider. The real
/// implementation wraps `DriveClient`; tests script a mock.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Download a file's stored bytes.
    async fn fetch(&self, file_id: &str) -> Result<Vec<u8>, FetchError>;

    /// Export a provider-native document into `target_mime`.
    async fn export(&self, file_id: &str, target_mime: &str) -> Result<Vec<u8>, FetchError>;
}

/// `FileFetcher` over a Drive client and an established session.
pub struct DriveFetcher {
    client: DriveClient,
    session: Session,
}

impl DriveFetcher {
    pub fn new(client: DriveClient, session: Session) -> Self {
        Self { client, session }
    }
}

impl From<DriveError> for FetchError {
    fn from(err: DriveError) -> Self {
        if err.is_access_or_format() {
            FetchError::AccessOrFormat(err.to_string())
        } else {
            FetchError::Provider(err.to_string())
        }
    }
}

#[async_trait]
impl FileFetcher for DriveFetcher {
    async fn fetch(&self, file_id: &str) -> Result<Vec<u8>, FetchError> {
        Ok(self.client.fetch_bytes(&self.session, file_id).await?)
    }

    async fn export(&self, file_id: &str, target_mime: &str) -> Result<Vec<u8>, FetchError> {
        Ok(self
            .client
            .export_bytes(&self.session, file_id, target_mime)
            .await?)
    }
}

// ---------------------------------------------------------------------------
// MIME dispatch
// ---------------------------------------------------------------------------

const WORDPROCESSING_MIME: &str = "vnd.openxmlformats-officedocument.wordprocessingml.document";
const PRESENTATION_MIME: &str = "vnd.openxmlformats-officedocument.presentationml.presentation";

const GOOGLE_NATIVE_PREFIX: &str = "application/vnd.google-apps.";
const GOOGLE_DOCUMENT: &str = "application/vnd.google-apps.document";
const GOOGLE_SPREADSHEET: &str = "application/vnd.google-apps.spreadsheet";
const GOOGLE_PRESENTATION: &str = "application/vnd.google-apps.presentation";
const GOOGLE_SHORTCUT: &str = "application/vnd.google-apps.shortcut";

/// Extract one file into its terminal payload. Never fails: every error
/// path ends in `ContentPayload::Unsupported` with a reason.
pub async fn extract(fetcher: &dyn FileFetcher, file: &FileDescriptor) -> ContentPayload {
    debug!(file = %file.name, mime = %file.mime_type, "Extracting");

    match fetcher.fetch(&file.id).await {
        Ok(bytes) => dispatch(&file.mime_type, bytes),
        Err(FetchError::AccessOrFormat(_)) if file.mime_type.starts_with(GOOGLE_NATIVE_PREFIX) => {
            export_fallback(fetcher, file).await
        }
        Err(err) => {
            warn!(file = %file.name, error = %err, "Fetch failed");
            ContentPayload::Unsupported(format!("provider API error: {err}"))
        }
    }
}

/// Route downloaded bytes by MIME substring, first match wins.
fn dispatch(mime_type: &str, bytes: Vec<u8>) -> ContentPayload {
    if mime_type.contains("pdf") {
        match pdf::extract_text(&bytes) {
            Ok(text) => ContentPayload::Text(text),
            Err(reason) => ContentPayload::Unsupported(format!("PDF parse error: {reason}")),
        }
    } else if mime_type.contains(WORDPROCESSING_MIME) {
        match office::extract_docx_text(&bytes) {
            Ok(text) => ContentPayload::Text(text),
            Err(reason) => ContentPayload::Unsupported(format!("document parse error: {reason}")),
        }
    } else if mime_type.contains(PRESENTATION_MIME) {
        match office::extract_pptx_text(&bytes) {
            Ok(text) => ContentPayload::Text(text),
            Err(reason) => {
                ContentPayload::Unsupported(format!("presentation parse error: {reason}"))
            }
        }
    } else if mime_type.contains("image") {
        match image::validate(&bytes) {
            Ok(_) => ContentPayload::Image(bytes),
            Err(reason) => ContentPayload::Unsupported(format!("image decode error: {reason}")),
        }
    } else if mime_type.contains("text") {
        ContentPayload::Text(String::from_utf8_lossy(&bytes).into_owned())
    } else {
        ContentPayload::Unsupported(format!("file type ('{mime_type}')"))
    }
}

/// Fallback for provider-native files: re-fetch through the export
/// endpoint in a text format, or mark the file unsupported.
async fn export_fallback(fetcher: &dyn FileFetcher, file: &FileDescriptor) -> ContentPayload {
    let target_mime = match file.mime_type.as_str() {
        GOOGLE_SHORTCUT => return ContentPayload::Unsupported("shortcut".to_string()),
        GOOGLE_DOCUMENT | GOOGLE_PRESENTATION => "text/plain",
        GOOGLE_SPREADSHEET => "text/csv",
        other => {
            return ContentPayload::Unsupported(format!("Google Workspace type ({other})"));
        }
    };

    match fetcher.export(&file.id, target_mime).await {
        Ok(bytes) => ContentPayload::Text(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) => {
            warn!(file = %file.name, error = %err, "Export failed");
            ContentPayload::Unsupported(format!("export error: {err}"))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// HashMap-based fetcher. Returns `Provider` errors for unregistered
    /// ids. Builder pattern: `.on_fetch()`, `.fail_fetch()`, `.on_export()`.
    #[derive(Default)]
    struct MockFetcher {
        fetches: HashMap<String, Result<Vec<u8>, FetchError>>,
        exports: HashMap<(String, String), Vec<u8>>,
    }

    impl MockFetcher {
        fn new() -> Self {
            Self::default()
        }

        fn on_fetch(mut self, file_id: &str, bytes: &[u8]) -> Self {
            self.fetches.insert(file_id.to_string(), Ok(bytes.to_vec()));
            self
        }

        fn fail_fetch(mut self, file_id: &str, err: FetchError) -> Self {
            self.fetches.insert(file_id.to_string(), Err(err));
            self
        }

        fn on_export(mut self, file_id: &str, target_mime: &str, bytes: &[u8]) -> Self {
            self.exports
                .insert((file_id.to_string(), target_mime.to_string()), bytes.to_vec());
            self
        }
    }

    #[async_trait]
    impl FileFetcher for MockFetcher {
        async fn fetch(&self, file_id: &str) -> Result<Vec<u8>, FetchError> {
            self.fetches
                .get(file_id)
                .cloned()
                .unwrap_or_else(|| Err(FetchError::Provider("unregistered id".to_string())))
        }

        async fn export(&self, file_id: &str, target_mime: &str) -> Result<Vec<u8>, FetchError> {
            self.exports
                .get(&(file_id.to_string(), target_mime.to_string()))
                .cloned()
                .ok_or_else(|| FetchError::AccessOrFormat("no export available".to_string()))
        }
    }

    fn file(id: &str, mime_type: &str) -> FileDescriptor {
        FileDescriptor::new(id, format!("{id}.bin"), mime_type)
    }

    #[tokio::test]
    async fn plain_text_decodes_leniently() {
        let fetcher = MockFetcher::new().on_fetch("f1", b"hello \xff world");
        let payload = extract(&fetcher, &file("f1", "text/plain")).await;
        assert_eq!(
            payload,
            ContentPayload::Text("hello \u{fffd} world".to_string())
        );
    }

    #[tokio::test]
    async fn unknown_mime_names_the_type() {
        let fetcher = MockFetcher::new().on_fetch("f1", b"\x00\x01");
        let payload = extract(&fetcher, &file("f1", "application/zip")).await;
        assert_eq!(
            payload,
            ContentPayload::Unsupported("file type ('application/zip')".to_string())
        );
    }

    #[tokio::test]
    async fn mime_matching_two_rules_uses_precedence() {
        // "pdf" outranks "image" in the dispatch order; garbage bytes make
        // the outcome observable as a PDF error rather than an image error.
        let fetcher = MockFetcher::new().on_fetch("f1", b"junk");
        let payload = extract(&fetcher, &file("f1", "image/pdf")).await;
        match payload {
            ContentPayload::Unsupported(reason) => {
                assert!(reason.starts_with("PDF parse error"), "got: {reason}")
            }
            other => panic!("expected unsupported, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_image_bytes_are_unsupported() {
        let fetcher = MockFetcher::new().on_fetch("f1", b"not an image");
        let payload = extract(&fetcher, &file("f1", "image/png")).await;
        assert!(matches!(payload, ContentPayload::Unsupported(_)));
    }

    #[tokio::test]
    async fn native_document_falls_back_to_plain_text_export() {
        let fetcher = MockFetcher::new()
            .fail_fetch("doc1", FetchError::AccessOrFormat("fileNotDownloadable".into()))
            .on_export("doc1", "text/plain", b"exported body");
        let payload = extract(
            &fetcher,
            &file("doc1", "application/vnd.google-apps.document"),
        )
        .await;
        assert_eq!(payload, ContentPayload::Text("exported body".to_string()));
    }

    #[tokio::test]
    async fn native_spreadsheet_exports_as_csv() {
        let fetcher = MockFetcher::new()
            .fail_fetch("sheet1", FetchError::AccessOrFormat("fileNotDownloadable".into()))
            .on_export("sheet1", "text/csv", b"a,b\n1,2");
        let payload = extract(
            &fetcher,
            &file("sheet1", "application/vnd.google-apps.spreadsheet"),
        )
        .await;
        assert_eq!(payload, ContentPayload::Text("a,b\n1,2".to_string()));
    }

    #[tokio::test]
    async fn shortcuts_are_skipped_not_resolved() {
        let fetcher = MockFetcher::new()
            .fail_fetch("s1", FetchError::AccessOrFormat("fileNotDownloadable".into()));
        let payload = extract(
            &fetcher,
            &file("s1", "application/vnd.google-apps.shortcut"),
        )
        .await;
        assert_eq!(payload, ContentPayload::Unsupported("shortcut".to_string()));
    }

    #[tokio::test]
    async fn unexportable_native_type_names_the_mime() {
        let fetcher = MockFetcher::new()
            .fail_fetch("form1", FetchError::AccessOrFormat("fileNotDownloadable".into()));
        let payload = extract(&fetcher, &file("form1", "application/vnd.google-apps.form")).await;
        assert_eq!(
            payload,
            ContentPayload::Unsupported(
                "Google Workspace type (application/vnd.google-apps.form)".to_string()
            )
        );
    }

    #[tokio::test]
    async fn access_error_on_non_native_mime_is_a_provider_error() {
        let fetcher = MockFetcher::new()
            .fail_fetch("f1", FetchError::AccessOrFormat("forbidden".into()));
        let payload = extract(&fetcher, &file("f1", "application/pdf")).await;
        match payload {
            ContentPayload::Unsupported(reason) => {
                assert!(reason.starts_with("provider API error"), "got: {reason}")
            }
            other => panic!("expected unsupported, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn export_failure_is_reported_not_swallowed() {
        // No export registered: the fallback itself fails.
        let fetcher = MockFetcher::new()
            .fail_fetch("doc1", FetchError::AccessOrFormat("fileNotDownloadable".into()));
        let payload = extract(
            &fetcher,
            &file("doc1", "application/vnd.google-apps.document"),
        )
        .await;
        match payload {
            ContentPayload::Unsupported(reason) => {
                assert!(reason.starts_with("export error"), "got: {reason}")
            }
            other => panic!("expected unsupported, got {other:?}"),
        }
    }
}
