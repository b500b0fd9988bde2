use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::attendance::{MeetingTimes, RawParticipant};

#[derive(Debug, Deserialize)]
pub struct ParticipantReportPage {
    #[serde(default)]
    pub participants: Vec<ReportParticipant>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// One row of the meeting participant report: a single join/leave pair.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportParticipant {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user_email: Option<String>,
    pub join_time: String,
    #[serde(default)]
    pub leave_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PastMeeting {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl PastMeeting {
    pub fn actual_times(&self) -> Option<MeetingTimes> {
        let start_time = parse_time(self.start_time.as_deref()?)?;
        let end_time = parse_time(self.end_time.as_deref()?)?;
        Some(MeetingTimes {
            start_time,
            end_time,
        })
    }
}

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Converts report rows, numbering them from `offset` so rows without an
/// id still get a unique participant id.
pub fn to_raw_participants(rows: Vec<ReportParticipant>, offset: usize) -> Vec<RawParticipant> {
    rows.into_iter()
        .zip(offset..)
        .filter_map(|(row, index)| {
            let Some(join_time) = parse_time(&row.join_time) else {
                warn!(name = %row.name, join_time = %row.join_time, "Dropping report row with unparseable join time");
                return None;
            };
            let leave_time = row.leave_time.as_deref().and_then(parse_time);
            let participant_id = match row.id.as_deref().filter(|id| !id.is_empty()) {
                Some(id) => format!("{}@{}", id, row.join_time),
                None => format!("row-{}@{}", index, row.join_time),
            };
            let email = row
                .user_email
                .filter(|e| !e.trim().is_empty());

            Some(RawParticipant {
                participant_id,
                email,
                display_name: row.name,
                join_time,
                leave_time,
            })
        })
        .collect()
}

/// Accumulates report pages, numbering rows across pages by their raw
/// position so positional ids stay unique even when rows are dropped.
#[derive(Debug, Default)]
pub struct ReportCollector {
    rows_seen: usize,
    participants: Vec<RawParticipant>,
}

impl ReportCollector {
    pub fn push_page(&mut self, rows: Vec<ReportParticipant>) {
        let offset = self.rows_seen;
        self.rows_seen += rows.len();
        self.participants.extend(to_raw_participants(rows, offset));
    }

    pub fn finish(self) -> Vec<RawParticipant> {
        self.participants
    }
}
