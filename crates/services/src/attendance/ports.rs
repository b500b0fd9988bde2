use async_trait::async_trait;
use bson::oid::ObjectId;

use super::error::ProviderError;
use super::types::{MeetingTimes, NewAttendance, RawParticipant, SessionDurationFields};
use crate::dao::base::DaoResult;

/// Read access to a completed meeting on the video-conferencing provider.
#[async_trait]
pub trait MeetingProvider: Send + Sync {
    /// Full participant log. Ordering is not guaranteed.
    async fn list_participants(&self, meeting_id: &str)
        -> Result<Vec<RawParticipant>, ProviderError>;

    /// Actual start/end of the meeting, if the provider reports them.
    async fn meeting_actual_times(
        &self,
        meeting_id: &str,
    ) -> Result<Option<MeetingTimes>, ProviderError>;
}

/// Produces a provider bound to freshly obtained credentials.
#[async_trait]
pub trait ProviderConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn MeetingProvider>, ProviderError>;
}

/// Registered-user directory. A miss is `Ok(None)`, never an error.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn resolve_user_by_email(&self, email: &str) -> DaoResult<Option<ObjectId>>;
    async fn resolve_user_by_alias(&self, email: &str) -> DaoResult<Option<ObjectId>>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn session_duration_fields(&self, session_id: ObjectId)
        -> DaoResult<SessionDurationFields>;

    async fn record_actual_duration(&self, session_id: ObjectId, minutes: u32) -> DaoResult<()>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Removes every record of the session together with its segments.
    async fn delete_for_session(&self, session_id: ObjectId) -> DaoResult<u64>;

    async fn insert_attendance(&self, attendance: &NewAttendance) -> DaoResult<ObjectId>;
}
