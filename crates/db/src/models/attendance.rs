use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Computed attendance of one resolved identity in one session.
///
/// Rows are never updated in place; a recomputation deletes every record
/// of the session (and its segments) before inserting the new set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub session_id: ObjectId,
    /// `None` for guests and unregistered emails.
    pub user_id: Option<ObjectId>,
    pub resolved_email_or_name: String,
    pub email: Option<String>,
    pub display_name: String,
    pub first_join_time: DateTime,
    pub last_leave_time: DateTime,
    pub total_duration_seconds: i64,
    pub attendance_percentage: f64,
    pub duration_minutes_used: u32,
    pub duration_source: DurationSource,
    pub created_at: DateTime,
}

/// Where the meeting duration used as the percentage denominator came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DurationSource {
    Provider,
    Caller,
    StoredActual,
    StoredScheduled,
}

/// One merged, disjoint connected interval of an attendance record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSegment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub attendance_id: ObjectId,
    pub session_id: ObjectId,
    pub position: u32,
    pub join_time: DateTime,
    pub leave_time: DateTime,
    pub duration_seconds: i64,
}

impl AttendanceRecord {
    pub const COLLECTION: &'static str = "attendance_records";
}

impl AttendanceSegment {
    pub const COLLECTION: &'static str = "attendance_segments";
}
