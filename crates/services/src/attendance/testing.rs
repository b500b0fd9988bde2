//! In-memory implementations of the engine ports for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Duration, TimeZone, Utc};

use super::error::ProviderError;
use super::ports::{AttendanceStore, IdentityDirectory, MeetingProvider, SessionStore};
use super::types::{MeetingTimes, NewAttendance, RawParticipant, SessionDurationFields};
use crate::dao::base::{DaoError, DaoResult};

/// `minutes` after a fixed meeting start.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 17, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn participant(
    id: &str,
    email: Option<&str>,
    name: &str,
    join: DateTime<Utc>,
    leave: Option<DateTime<Utc>>,
) -> RawParticipant {
    RawParticipant {
        participant_id: id.to_string(),
        email: email.map(str::to_string),
        display_name: name.to_string(),
        join_time: join,
        leave_time: leave,
    }
}

#[derive(Default)]
pub struct StaticDirectory {
    users: HashMap<String, ObjectId>,
    aliases: HashMap<String, ObjectId>,
    failing: bool,
}

impl StaticDirectory {
    pub fn with_user(mut self, email: &str, id: ObjectId) -> Self {
        self.users.insert(email.to_string(), id);
        self
    }

    pub fn with_alias(mut self, email: &str, id: ObjectId) -> Self {
        self.aliases.insert(email.to_string(), id);
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

#[async_trait]
impl IdentityDirectory for StaticDirectory {
    async fn resolve_user_by_email(&self, email: &str) -> DaoResult<Option<ObjectId>> {
        if self.failing {
            return Err(DaoError::Validation("directory offline".to_string()));
        }
        Ok(self.users.get(email).copied())
    }

    async fn resolve_user_by_alias(&self, email: &str) -> DaoResult<Option<ObjectId>> {
        if self.failing {
            return Err(DaoError::Validation("directory offline".to_string()));
        }
        Ok(self.aliases.get(email).copied())
    }
}

#[derive(Default)]
pub struct ScriptedProvider {
    participants: Vec<RawParticipant>,
    times: Option<MeetingTimes>,
    fail_participants: bool,
    fail_times: bool,
}

impl ScriptedProvider {
    pub fn with_participants(mut self, participants: Vec<RawParticipant>) -> Self {
        self.participants = participants;
        self
    }

    pub fn with_times(mut self, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        self.times = Some(MeetingTimes { start_time, end_time });
        self
    }

    pub fn failing_participants(mut self) -> Self {
        self.fail_participants = true;
        self
    }

    pub fn failing_times(mut self) -> Self {
        self.fail_times = true;
        self
    }
}

#[async_trait]
impl MeetingProvider for ScriptedProvider {
    async fn list_participants(
        &self,
        _meeting_id: &str,
    ) -> Result<Vec<RawParticipant>, ProviderError> {
        if self.fail_participants {
            return Err(ProviderError::InvalidResponse("report unavailable".to_string()));
        }
        Ok(self.participants.clone())
    }

    async fn meeting_actual_times(
        &self,
        _meeting_id: &str,
    ) -> Result<Option<MeetingTimes>, ProviderError> {
        if self.fail_times {
            return Err(ProviderError::InvalidResponse("meeting unavailable".to_string()));
        }
        Ok(self.times)
    }
}

#[derive(Default)]
pub struct MemorySessions {
    sessions: Mutex<HashMap<ObjectId, SessionDurationFields>>,
}

impl MemorySessions {
    pub fn add(&self, actual_minutes: Option<u32>, scheduled_minutes: Option<u32>) -> ObjectId {
        let id = ObjectId::new();
        self.sessions.lock().unwrap().insert(
            id,
            SessionDurationFields {
                actual_minutes,
                scheduled_minutes,
            },
        );
        id
    }

    pub fn fields(&self, id: ObjectId) -> SessionDurationFields {
        self.sessions.lock().unwrap()[&id]
    }
}

#[async_trait]
impl SessionStore for MemorySessions {
    async fn session_duration_fields(
        &self,
        session_id: ObjectId,
    ) -> DaoResult<SessionDurationFields> {
        self.sessions
            .lock()
            .unwrap()
            .get(&session_id)
            .copied()
            .ok_or(DaoError::NotFound)
    }

    async fn record_actual_duration(&self, session_id: ObjectId, minutes: u32) -> DaoResult<()> {
        let mut sessions = self.sessions.lock().unwrap();
        let fields = sessions.get_mut(&session_id).ok_or(DaoError::NotFound)?;
        fields.actual_minutes = Some(minutes);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryAttendance {
    rows: Mutex<Vec<NewAttendance>>,
    reject: HashSet<String>,
    pub deletes: AtomicUsize,
}

impl MemoryAttendance {
    /// Rejects inserts whose resolved email or name equals `email_or_name`.
    pub fn rejecting(mut self, email_or_name: &str) -> Self {
        self.reject.insert(email_or_name.to_string());
        self
    }

    pub fn seed(&self, row: NewAttendance) {
        self.rows.lock().unwrap().push(row);
    }

    pub fn rows(&self, session_id: ObjectId) -> Vec<NewAttendance> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect()
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AttendanceStore for MemoryAttendance {
    async fn delete_for_session(&self, session_id: ObjectId) -> DaoResult<u64> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.session_id != session_id);
        Ok((before - rows.len()) as u64)
    }

    async fn insert_attendance(&self, attendance: &NewAttendance) -> DaoResult<ObjectId> {
        if self.reject.contains(&attendance.resolved_email_or_name) {
            return Err(DaoError::Validation("write rejected".to_string()));
        }
        self.rows.lock().unwrap().push(attendance.clone());
        Ok(ObjectId::new())
    }
}
