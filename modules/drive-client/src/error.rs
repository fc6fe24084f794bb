use thiserror::Error;

pub type Result<T> = std::result::Result<T, DriveError>;

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The class of failure that triggers the export fallback for
    /// provider-native documents: the file exists but cannot be fetched
    /// in its stored format (403 "fileNotDownloadable" and friends).
    #[error("Access/format error (status {status}): {message}")]
    AccessOrFormat { status: u16, message: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Download exceeded its attempt budget or deadline: {0}")]
    Timeout(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl DriveError {
    /// Classify an unsuccessful HTTP response from the Drive API.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            400 | 403 => DriveError::AccessOrFormat { status, message },
            401 => DriveError::Auth(message),
            _ => DriveError::Api { status, message },
        }
    }

    pub fn is_access_or_format(&self) -> bool {
        matches!(self, DriveError::AccessOrFormat { .. })
    }
}

impl From<reqwest::Error> for DriveError {
    fn from(err: reqwest::Error) -> Self {
        DriveError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for DriveError {
    fn from(err: serde_json::Error) -> Self {
        DriveError::Parse(err.to_string())
    }
}
