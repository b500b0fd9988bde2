use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A scheduled class instance that attendance is computed for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortSession {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub cohort_id: Option<ObjectId>,
    pub title: String,
    pub zoom_meeting_id: Option<String>,
    pub scheduled_start: Option<DateTime>,
    pub scheduled_duration_minutes: Option<u32>,
    pub actual_duration_minutes: Option<u32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl CohortSession {
    pub const COLLECTION: &'static str = "sessions";
}
