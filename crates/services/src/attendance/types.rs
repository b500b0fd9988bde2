use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use cohort_db::models::DurationSource;

/// One provider-reported connection event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParticipant {
    /// Unique per connection event, not per person.
    pub participant_id: String,
    pub email: Option<String>,
    pub display_name: String,
    pub join_time: DateTime<Utc>,
    pub leave_time: Option<DateTime<Utc>>,
}

/// A continuous connected interval. `leave_time >= join_time` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSegment {
    join_time: DateTime<Utc>,
    leave_time: DateTime<Utc>,
}

impl TimeSegment {
    /// Builds a segment, clamping a leave time that precedes the join time.
    pub fn new(join_time: DateTime<Utc>, leave_time: DateTime<Utc>) -> Self {
        Self {
            join_time,
            leave_time: leave_time.max(join_time),
        }
    }

    pub fn join_time(&self) -> DateTime<Utc> {
        self.join_time
    }

    pub fn leave_time(&self) -> DateTime<Utc> {
        self.leave_time
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.leave_time - self.join_time).num_seconds()
    }

    pub(crate) fn extend_to(&mut self, leave_time: DateTime<Utc>) {
        self.leave_time = self.leave_time.max(leave_time);
    }
}

/// Bucket key produced by the grouper.
///
/// Guests without an email are keyed by their own participant id, so two
/// guests sharing a display name stay separate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Email(String),
    Guest(String),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResolvedKey {
    Matched(ObjectId),
    Unmatched(GroupKey),
}

/// Everything known about one identity after grouping and resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParticipant {
    pub key: ResolvedKey,
    pub email: Option<String>,
    pub display_name: String,
    /// Unmerged, ordered by join time.
    pub segments: Vec<TimeSegment>,
}

impl ResolvedParticipant {
    pub fn user_id(&self) -> Option<ObjectId> {
        match self.key {
            ResolvedKey::Matched(id) => Some(id),
            ResolvedKey::Unmatched(_) => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self.key, ResolvedKey::Matched(_))
    }

    /// Email when one is known, display name otherwise.
    pub fn email_or_name(&self) -> String {
        self.email
            .clone()
            .unwrap_or_else(|| self.display_name.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeetingTimes {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeetingDuration {
    pub minutes: u32,
    pub source: DurationSource,
}

/// Duration fields stored on a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionDurationFields {
    pub actual_minutes: Option<u32>,
    pub scheduled_minutes: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttendanceCalculation {
    pub total_seconds: i64,
    pub percentage: f64,
}

/// A fully computed attendance row ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    pub session_id: ObjectId,
    pub user_id: Option<ObjectId>,
    pub resolved_email_or_name: String,
    pub email: Option<String>,
    pub display_name: String,
    pub first_join_time: DateTime<Utc>,
    pub last_leave_time: DateTime<Utc>,
    pub total_duration_seconds: i64,
    pub attendance_percentage: f64,
    pub duration: MeetingDuration,
    /// Merged, disjoint and sorted.
    pub segments: Vec<TimeSegment>,
}

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    pub imported: u32,
    pub unmatched: u32,
    pub skipped: u32,
    pub duration_used: u32,
    pub duration_source: Option<DurationSource>,
}
