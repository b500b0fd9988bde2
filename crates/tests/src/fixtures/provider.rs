use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use cohort_services::attendance::{
    MeetingProvider, MeetingTimes, ProviderConnector, ProviderError, RawParticipant,
};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Start of every scripted meeting: 2024-03-04 17:00 UTC.
pub fn meeting_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 17, 0, 0).unwrap()
}

pub fn at(minutes: i64) -> DateTime<Utc> {
    meeting_start() + Duration::minutes(minutes)
}

/// One participant-report row, with times in minutes after the meeting start.
pub fn row(id: &str, email: Option<&str>, name: &str, join: i64, leave: Option<i64>) -> RawParticipant {
    RawParticipant {
        participant_id: format!("{}@{}", id, join),
        email: email.map(str::to_string),
        display_name: name.to_string(),
        join_time: at(join),
        leave_time: leave.map(at),
    }
}

#[derive(Clone, Default)]
struct ScriptedMeeting {
    participants: Vec<RawParticipant>,
    times: Option<MeetingTimes>,
}

/// Meeting provider whose reports are set up by the test.
#[derive(Default)]
pub struct ScriptedConnector {
    meetings: DashMap<String, ScriptedMeeting>,
    refuse_auth: AtomicBool,
    connects: AtomicUsize,
}

impl ScriptedConnector {
    pub fn script(&self, meeting_id: &str, participants: Vec<RawParticipant>) {
        self.meetings
            .entry(meeting_id.to_string())
            .or_default()
            .participants = participants;
    }

    /// Reports actual times spanning `minutes` from the meeting start.
    pub fn script_times(&self, meeting_id: &str, minutes: i64) {
        self.meetings.entry(meeting_id.to_string()).or_default().times = Some(MeetingTimes {
            start_time: meeting_start(),
            end_time: at(minutes),
        });
    }

    pub fn refuse_auth(&self) {
        self.refuse_auth.store(true, Ordering::SeqCst);
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderConnector for ScriptedConnector {
    async fn connect(&self) -> Result<Box<dyn MeetingProvider>, ProviderError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.refuse_auth.load(Ordering::SeqCst) {
            return Err(ProviderError::Auth("invalid client credentials".to_string()));
        }
        let meetings = self
            .meetings
            .iter()
            .map(|m| (m.key().clone(), m.value().clone()))
            .collect();
        Ok(Box::new(ScriptedProvider { meetings }))
    }
}

struct ScriptedProvider {
    meetings: Vec<(String, ScriptedMeeting)>,
}

impl ScriptedProvider {
    fn meeting(&self, meeting_id: &str) -> Option<&ScriptedMeeting> {
        self.meetings
            .iter()
            .find(|(id, _)| id == meeting_id)
            .map(|(_, m)| m)
    }
}

#[async_trait]
impl MeetingProvider for ScriptedProvider {
    async fn list_participants(
        &self,
        meeting_id: &str,
    ) -> Result<Vec<RawParticipant>, ProviderError> {
        self.meeting(meeting_id)
            .map(|m| m.participants.clone())
            .ok_or_else(|| ProviderError::InvalidResponse(format!("meeting {} not found", meeting_id)))
    }

    async fn meeting_actual_times(
        &self,
        meeting_id: &str,
    ) -> Result<Option<MeetingTimes>, ProviderError> {
        Ok(self.meeting(meeting_id).and_then(|m| m.times))
    }
}
