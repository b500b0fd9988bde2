//! Zoom server-to-server OAuth integration.
//!
//! Credentials are plain data: every reconciliation run obtains a fresh
//! token through [`ZoomService::fetch_credentials`] and hands it to a
//! [`ZoomMeetingClient`]. Nothing is cached process-wide.

pub mod client;
pub mod report;

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use cohort_config::ZoomSettings;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::attendance::{MeetingProvider, ProviderConnector, ProviderError};

pub use client::ZoomMeetingClient;

/// Tokens closer than this to expiry are treated as expired.
const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Debug, Clone)]
pub struct ZoomCredentials {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl ZoomCredentials {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_SKEW_SECS) >= self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

pub struct ZoomService {
    client: Client,
    settings: ZoomSettings,
}

impl ZoomService {
    pub fn new(settings: ZoomSettings) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Self { client, settings })
    }

    pub fn is_configured(&self) -> bool {
        !self.settings.account_id.is_empty()
            && !self.settings.client_id.is_empty()
            && !self.settings.client_secret.is_empty()
    }

    pub async fn fetch_credentials(&self) -> Result<ZoomCredentials, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::Auth("Zoom credentials are not configured".to_string()));
        }

        let resp = self
            .client
            .post(&self.settings.oauth_url)
            .basic_auth(&self.settings.client_id, Some(&self.settings.client_secret))
            .query(&[
                ("grant_type", "account_credentials"),
                ("account_id", self.settings.account_id.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Auth(format!("{}: {}", status, body)));
        }

        let token: TokenResponse = resp.json().await?;
        debug!(expires_in = token.expires_in, "Obtained Zoom access token");

        Ok(ZoomCredentials {
            access_token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        })
    }

    pub fn meeting_client(&self, credentials: ZoomCredentials) -> ZoomMeetingClient {
        ZoomMeetingClient::new(
            self.client.clone(),
            self.settings.api_base_url.clone(),
            self.settings.page_size,
            credentials,
        )
    }
}

#[async_trait]
impl ProviderConnector for ZoomService {
    async fn connect(&self) -> Result<Box<dyn MeetingProvider>, ProviderError> {
        let credentials = self.fetch_credentials().await?;
        Ok(Box::new(self.meeting_client(credentials)))
    }
}
