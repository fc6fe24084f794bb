//! Drive session state.
//!
//! Credentials live in an explicit `Session` value with init/expire/refresh
//! transitions, passed by reference into every client call. Nothing here is
//! ambient or global.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::info;

use crate::error::{DriveError, Result};

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Refresh this long before the recorded expiry to avoid mid-batch 401s.
const EXPIRY_SKEW_SECONDS: i64 = 60;

#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

impl Session {
    /// Start a session from an already-issued access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// True when the access token is past (or within skew of) its expiry.
    /// Sessions without a recorded expiry are assumed live.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => Utc::now() + Duration::seconds(EXPIRY_SKEW_SECONDS) >= at,
            None => false,
        }
    }

    /// Exchange the refresh token for a fresh access token.
    pub async fn refresh(
        &mut self,
        http: &reqwest::Client,
        client_id: &str,
        client_secret: &str,
    ) -> Result<()> {
        let refresh_token = self
            .refresh_token
            .as_deref()
            .ok_or_else(|| DriveError::Auth("session has no refresh token".to_string()))?;

        let resp = http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(DriveError::Auth(format!(
                "token refresh failed (status {status}): {message}"
            )));
        }

        let token: TokenResponse = resp.json().await?;
        self.access_token = token.access_token;
        self.expires_at = token
            .expires_in
            .map(|seconds| Utc::now() + Duration::seconds(seconds));

        info!(expires_at = ?self.expires_at, "Drive session refreshed");
        Ok(())
    }
}
