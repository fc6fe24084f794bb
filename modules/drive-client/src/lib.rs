pub mod error;
pub mod session;
pub mod types;

pub use error::{DriveError, Result};
pub use session::Session;
pub use types::DriveFile;

use std::time::{Duration, Instant};

use reqwest::header::RANGE;
use reqwest::StatusCode;
use tracing::{debug, warn};

const DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v3";

/// Listing page cap. One page only — the workflow never paginates further.
const LIST_PAGE_SIZE: u32 = 200;

const NON_FOLDER_QUERY: &str = "mimeType != 'application/vnd.google-apps.folder'";

/// Bounds for one chunked transfer. Every download runs under an attempt
/// budget and a wall-clock deadline so a stalling provider surfaces as a
/// typed error instead of hanging the batch.
#[derive(Debug, Clone)]
pub struct DownloadPolicy {
    pub chunk_size: usize,
    pub max_attempts: u32,
    pub deadline: Duration,
}

impl Default for DownloadPolicy {
    fn default() -> Self {
        Self {
            chunk_size: 1024 * 1024,
            max_attempts: 3,
            deadline: Duration::from_secs(120),
        }
    }
}

pub struct DriveClient {
    http: reqwest::Client,
    base_url: String,
    policy: DownloadPolicy,
}

impl DriveClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DRIVE_API_URL.to_string(),
            policy: DownloadPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_download_policy(mut self, policy: DownloadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// List up to one page of non-folder files.
    pub async fn list_files(&self, session: &Session) -> Result<Vec<DriveFile>> {
        let url = format!("{}/files", self.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&session.access_token)
            .query(&[
                ("pageSize", LIST_PAGE_SIZE.to_string().as_str()),
                ("fields", "files(id, name, mimeType)"),
                ("q", NON_FOLDER_QUERY),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(DriveError::from_status(status.as_u16(), message));
        }

        let list: types::FileList = resp.json().await?;
        debug!(count = list.files.len(), "Listed Drive files");
        Ok(list.files)
    }

    /// Download a file's stored bytes.
    pub async fn fetch_bytes(&self, session: &Session, file_id: &str) -> Result<Vec<u8>> {
        let url = format!("{}/files/{}", self.base_url, file_id);
        self.download(session, &url, &[("alt", "media")]).await
    }

    /// Export a provider-native document into `target_mime`.
    pub async fn export_bytes(
        &self,
        session: &Session,
        file_id: &str,
        target_mime: &str,
    ) -> Result<Vec<u8>> {
        let url = format!("{}/files/{}/export", self.base_url, file_id);
        self.download(session, &url, &[("mimeType", target_mime)])
            .await
    }

    /// Chunked range download with a failure budget and deadline.
    ///
    /// Successful chunks advance the transfer for free; a chunk that fails
    /// (network error, or a 206 that makes no progress) consumes one
    /// attempt. A server that ignores Range and answers 200 ends the
    /// transfer in one response.
    async fn download(
        &self,
        session: &Session,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<u8>> {
        let started = Instant::now();
        let mut bytes: Vec<u8> = Vec::new();
        let mut failed_attempts = 0u32;
        let mut total_size: Option<u64> = None;

        loop {
            if started.elapsed() >= self.policy.deadline {
                return Err(DriveError::Timeout(format!(
                    "deadline of {:?} elapsed after {} bytes",
                    self.policy.deadline,
                    bytes.len()
                )));
            }
            if failed_attempts >= self.policy.max_attempts {
                return Err(DriveError::Timeout(format!(
                    "attempt budget of {} exhausted after {} bytes",
                    self.policy.max_attempts,
                    bytes.len()
                )));
            }

            let range_start = bytes.len();
            let range_end = range_start + self.policy.chunk_size - 1;
            let resp = match self
                .http
                .get(url)
                .bearer_auth(&session.access_token)
                .query(query)
                .header(RANGE, format!("bytes={range_start}-{range_end}"))
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(err) => {
                    failed_attempts += 1;
                    warn!(url, attempt = failed_attempts, error = %err, "Chunk request failed");
                    continue;
                }
            };

            let status = resp.status();
            match status {
                StatusCode::OK => {
                    // Server ignored the Range header; the body is the whole file.
                    let body = resp.bytes().await?;
                    bytes.extend_from_slice(&body);
                    debug!(url, size = bytes.len(), "Download complete (single response)");
                    return Ok(bytes);
                }
                StatusCode::PARTIAL_CONTENT => {
                    if total_size.is_none() {
                        total_size = content_range_total(&resp);
                    }
                    let body = resp.bytes().await?;
                    let chunk_len = body.len();
                    bytes.extend_from_slice(&body);

                    if chunk_len == 0 {
                        // A 206 with no payload makes no progress.
                        failed_attempts += 1;
                        continue;
                    }
                    let done = match total_size {
                        Some(total) => bytes.len() as u64 >= total,
                        // No Content-Range total: a short chunk means EOF.
                        None => chunk_len < self.policy.chunk_size,
                    };
                    if done {
                        debug!(url, size = bytes.len(), "Download complete");
                        return Ok(bytes);
                    }
                }
                StatusCode::RANGE_NOT_SATISFIABLE if range_start > 0 => {
                    // Asked past EOF on an exact multiple of the chunk size.
                    return Ok(bytes);
                }
                _ => {
                    let message = resp.text().await.unwrap_or_default();
                    return Err(DriveError::from_status(status.as_u16(), message));
                }
            }
        }
    }
}

impl Default for DriveClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the total size out of a `Content-Range: bytes 0-99/1234` header.
fn content_range_total(resp: &reqwest::Response) -> Option<u64> {
    resp.headers()
        .get(reqwest::header::CONTENT_RANGE)?
        .to_str()
        .ok()?
        .rsplit('/')
        .next()?
        .parse()
        .ok()
}
