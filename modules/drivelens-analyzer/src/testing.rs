// Test mocks for the analysis pipeline.
//
// Two mocks matching the two trait boundaries:
// - MockFetcher (FileFetcher) — HashMap-based id→bytes/error
// - MockChatModel (ChatModel) — scripted responses keyed on prompt text
//
// Plus helpers for constructing FileDescriptors. No network, no Docker.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use ai_client::error::{AiError, Result as AiResult};
use ai_client::{ChatModel, ChatRequest, ContentPart};
use drivelens_common::FileDescriptor;
use drivelens_extract::{FetchError, FileFetcher};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// HashMap-based fetcher. Unregistered ids fail with a provider error.
/// Builder pattern: `.on_fetch()`, `.fail_fetch()`, `.on_export()`.
#[derive(Default)]
pub struct MockFetcher {
    fetches: HashMap<String, Result<Vec<u8>, FetchError>>,
    exports: HashMap<(String, String), Vec<u8>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_fetch(mut self, file_id: &str, bytes: &[u8]) -> Self {
        self.fetches.insert(file_id.to_string(), Ok(bytes.to_vec()));
        self
    }

    pub fn fail_fetch(mut self, file_id: &str, err: FetchError) -> Self {
        self.fetches.insert(file_id.to_string(), Err(err));
        self
    }

    pub fn on_export(mut self, file_id: &str, target_mime: &str, bytes: &[u8]) -> Self {
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

// ---------------------------------------------------------------------------
// MockChatModel
// ---------------------------------------------------------------------------

/// Scripted chat model. Every request is recorded for assertions; the
/// response is the first rule whose needle appears in the request text,
/// falling back to the default. `failing_when` scripts an API error.
pub struct MockChatModel {
    model_name: String,
    default_response: String,
    rules: Vec<(String, String)>,
    fail_when: Option<String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatModel {
    pub fn new(default_response: &str) -> Self {
        Self {
            model_name: "mock-model".to_string(),
            default_response: default_response.to_string(),
            rules: Vec::new(),
            fail_when: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond_when(mut self, needle: &str, response: &str) -> Self {
        self.rules.push((needle.to_string(), response.to_string()));
        self
    }

    pub fn failing_when(mut self, needle: &str) -> Self {
        self.fail_when = Some(needle.to_string());
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// All text parts of the recorded request, concatenated in order.
    pub fn request_text(&self, index: usize) -> String {
        flatten_text(&self.requests.lock().unwrap()[index])
    }

    /// Image parts of the recorded request, in order.
    pub fn request_images(&self, index: usize) -> Vec<Vec<u8>> {
        self.requests.lock().unwrap()[index]
            .messages
            .iter()
            .flat_map(|m| m.parts.iter())
            .filter_map(|part| match part {
                ContentPart::Image { data, .. } => Some(data.clone()),
                ContentPart::Text(_) => None,
            })
            .collect()
    }
}

fn flatten_text(request: &ChatRequest) -> String {
    request
        .messages
        .iter()
        .flat_map(|m| m.parts.iter())
        .filter_map(|part| match part {
            ContentPart::Text(text) => Some(text.as_str()),
            ContentPart::Image { .. } => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn model(&self) -> &str {
        &self.model_name
    }

    async fn chat(&self, request: ChatRequest) -> AiResult<String> {
        let text = flatten_text(&request);
        self.requests.lock().unwrap().push(request);

        if let Some(needle) = &self.fail_when {
            if text.contains(needle.as_str()) {
                return Err(AiError::Api {
                    status: 500,
                    message: "scripted failure".to_string(),
                });
            }
        }

        for (needle, response) in &self.rules {
            if text.contains(needle.as_str()) {
                return Ok(response.clone());
            }
        }
        Ok(self.default_response.clone())
    }
}

// ---------------------------------------------------------------------------
// Descriptor helpers
// ---------------------------------------------------------------------------

pub fn text_file(id: &str, name: &str) -> FileDescriptor {
    FileDescriptor::new(id, name, "text/plain")
}

pub fn image_file(id: &str, name: &str) -> FileDescriptor {
    FileDescriptor::new(id, name, "image/png")
}

/// A tiny but fully valid PNG for image-path tests.
pub fn one_pixel_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(1, 1, image::Rgb([0, 128, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .expect("encode png");
    bytes
}
