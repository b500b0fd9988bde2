use bson::oid::ObjectId;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use super::error::ReconcileError;
use super::ports::{MeetingProvider, SessionStore};
use super::types::{DurationSource, MeetingDuration, MeetingTimes, RawParticipant};
use crate::dao::base::DaoError;

/// Picks the meeting duration from the first source yielding a positive
/// value: provider-reported times, caller override, stored actual, stored
/// scheduled.
pub async fn resolve_meeting_duration(
    provider: &dyn MeetingProvider,
    sessions: &dyn SessionStore,
    session_id: ObjectId,
    meeting_id: &str,
    caller_minutes: Option<u32>,
) -> Result<MeetingDuration, ReconcileError> {
    match provider.meeting_actual_times(meeting_id).await {
        Ok(Some(times)) => {
            if let Some(minutes) = provider_minutes(&times) {
                return Ok(MeetingDuration {
                    minutes,
                    source: DurationSource::Provider,
                });
            }
        }
        Ok(None) => debug!(meeting_id, "Provider reported no actual meeting times"),
        Err(e) => warn!(meeting_id, error = %e, "Actual meeting times unavailable"),
    }

    if let Some(minutes) = caller_minutes.filter(|m| *m > 0) {
        return Ok(MeetingDuration {
            minutes,
            source: DurationSource::Caller,
        });
    }

    let fields = sessions
        .session_duration_fields(session_id)
        .await
        .map_err(|e| match e {
            DaoError::NotFound => ReconcileError::SessionNotFound(session_id),
            other => ReconcileError::Dao(other),
        })?;

    if let Some(minutes) = fields.actual_minutes.filter(|m| *m > 0) {
        return Ok(MeetingDuration {
            minutes,
            source: DurationSource::StoredActual,
        });
    }
    if let Some(minutes) = fields.scheduled_minutes.filter(|m| *m > 0) {
        return Ok(MeetingDuration {
            minutes,
            source: DurationSource::StoredScheduled,
        });
    }

    Err(ReconcileError::DurationUnresolved { session_id })
}

/// Whole minutes between reported start and end, rounded half up.
fn provider_minutes(times: &MeetingTimes) -> Option<u32> {
    let seconds = (times.end_time - times.start_time).num_seconds();
    if seconds <= 0 {
        return None;
    }
    let minutes = (seconds + 30) / 60;
    u32::try_from(minutes).ok().filter(|m| *m > 0)
}

/// Latest recorded leave time, or earliest join plus the meeting duration
/// when nobody has a recorded leave time. `None` only for an empty log.
pub fn compute_meeting_end(
    records: &[RawParticipant],
    duration_minutes: u32,
) -> Option<DateTime<Utc>> {
    if let Some(latest) = records.iter().filter_map(|r| r.leave_time).max() {
        return Some(latest);
    }
    records
        .iter()
        .map(|r| r.join_time)
        .min()
        .map(|earliest| earliest + Duration::minutes(i64::from(duration_minutes)))
}
