use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::ZoomCredentials;
use super::report::{ParticipantReportPage, PastMeeting, ReportCollector};
use crate::attendance::{MeetingProvider, MeetingTimes, ProviderError, RawParticipant};

/// Meeting report reader bound to one set of credentials.
pub struct ZoomMeetingClient {
    client: Client,
    api_base_url: String,
    page_size: u32,
    credentials: ZoomCredentials,
}

impl ZoomMeetingClient {
    pub fn new(
        client: Client,
        api_base_url: String,
        page_size: u32,
        credentials: ZoomCredentials,
    ) -> Self {
        Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            page_size,
            credentials,
        }
    }

    fn token(&self) -> Result<&str, ProviderError> {
        if self.credentials.is_expired(Utc::now()) {
            return Err(ProviderError::Auth("Zoom access token expired".to_string()));
        }
        Ok(&self.credentials.access_token)
    }
}

/// Meeting UUIDs that start with `/` or contain `//` must be encoded twice.
pub fn encode_meeting_id(meeting_id: &str) -> String {
    let once = urlencoding::encode(meeting_id);
    if meeting_id.starts_with('/') || meeting_id.contains("//") {
        urlencoding::encode(&once).into_owned()
    } else {
        once.into_owned()
    }
}

#[async_trait]
impl MeetingProvider for ZoomMeetingClient {
    async fn list_participants(
        &self,
        meeting_id: &str,
    ) -> Result<Vec<RawParticipant>, ProviderError> {
        let url = format!(
            "{}/report/meetings/{}/participants",
            self.api_base_url,
            encode_meeting_id(meeting_id)
        );
        let page_size = self.page_size.to_string();

        let mut collector = ReportCollector::default();
        let mut next_page_token: Option<String> = None;
        loop {
            let mut query = vec![("page_size", page_size.as_str())];
            if let Some(token) = next_page_token.as_deref() {
                query.push(("next_page_token", token));
            }

            let page: ParticipantReportPage = self
                .client
                .get(&url)
                .bearer_auth(self.token()?)
                .query(&query)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            let rows = page.participants.len();
            collector.push_page(page.participants);
            debug!(meeting_id, rows, "Fetched participant report page");

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => next_page_token = Some(token),
                None => break,
            }
        }

        Ok(collector.finish())
    }

    async fn meeting_actual_times(
        &self,
        meeting_id: &str,
    ) -> Result<Option<MeetingTimes>, ProviderError> {
        let url = format!(
            "{}/past_meetings/{}",
            self.api_base_url,
            encode_meeting_id(meeting_id)
        );
        let resp = self
            .client
            .get(&url)
            .bearer_auth(self.token()?)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let meeting: PastMeeting = resp.error_for_status()?.json().await?;
        Ok(meeting.actual_times())
    }
}
