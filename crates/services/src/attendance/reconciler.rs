use std::sync::Arc;

use bson::oid::ObjectId;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::calculator::calculate_attendance;
use super::duration::{compute_meeting_end, resolve_meeting_duration};
use super::error::ReconcileError;
use super::grouper::group_participants;
use super::identity::resolve_user_ids;
use super::ports::{AttendanceStore, IdentityDirectory, MeetingProvider, SessionStore};
use super::segments::merge_overlapping;
use super::types::{
    DurationSource, MeetingDuration, NewAttendance, ReconcileSummary, ResolvedParticipant,
    TimeSegment,
};

/// Progress of one reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStage {
    FetchingParticipants,
    Grouping,
    ResolvingIdentities,
    Merging,
    Calculating,
    Persisting,
    Done,
    Failed,
}

/// Recomputes a session's attendance from the provider's participant log,
/// replacing whatever was stored before.
pub struct AttendanceReconciler {
    directory: Arc<dyn IdentityDirectory>,
    sessions: Arc<dyn SessionStore>,
    attendance: Arc<dyn AttendanceStore>,
    locks: DashMap<ObjectId, Arc<Mutex<()>>>,
}

impl AttendanceReconciler {
    pub fn new(
        directory: Arc<dyn IdentityDirectory>,
        sessions: Arc<dyn SessionStore>,
        attendance: Arc<dyn AttendanceStore>,
    ) -> Self {
        Self {
            directory,
            sessions,
            attendance,
            locks: DashMap::new(),
        }
    }

    /// Runs for the same session are serialized; different sessions run
    /// independently.
    pub async fn reconcile_session_attendance(
        &self,
        provider: &dyn MeetingProvider,
        session_id: ObjectId,
        meeting_id: &str,
        caller_minutes: Option<u32>,
    ) -> Result<ReconcileSummary, ReconcileError> {
        let lock = self
            .locks
            .entry(session_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock().await;
            let mut stage = ReconcileStage::FetchingParticipants;
            let result = self
                .run(provider, session_id, meeting_id, caller_minutes, &mut stage)
                .await;
            match &result {
                Ok(summary) => {
                    advance(&mut stage, ReconcileStage::Done, session_id);
                    info!(
                        %session_id,
                        meeting_id,
                        imported = summary.imported,
                        unmatched = summary.unmatched,
                        skipped = summary.skipped,
                        duration = summary.duration_used,
                        "Attendance reconciled"
                    );
                }
                Err(e) => {
                    let failed_at = stage;
                    advance(&mut stage, ReconcileStage::Failed, session_id);
                    error!(%session_id, meeting_id, stage = ?failed_at, error = %e, "Attendance reconciliation failed");
                }
            }
            result
        };

        drop(lock);
        self.locks
            .remove_if(&session_id, |_, l| Arc::strong_count(l) == 1);

        result
    }

    async fn run(
        &self,
        provider: &dyn MeetingProvider,
        session_id: ObjectId,
        meeting_id: &str,
        caller_minutes: Option<u32>,
        stage: &mut ReconcileStage,
    ) -> Result<ReconcileSummary, ReconcileError> {
        debug!(%session_id, meeting_id, stage = ?stage, "Reconciliation started");
        let records = provider.list_participants(meeting_id).await?;
        if records.is_empty() {
            info!(%session_id, meeting_id, "No participants recorded for meeting");
            return Ok(ReconcileSummary {
                imported: 0,
                unmatched: 0,
                skipped: 0,
                duration_used: 0,
                duration_source: None,
            });
        }

        let duration = resolve_meeting_duration(
            provider,
            self.sessions.as_ref(),
            session_id,
            meeting_id,
            caller_minutes,
        )
        .await?;
        let meeting_end = compute_meeting_end(&records, duration.minutes)
            .ok_or(ReconcileError::DurationUnresolved { session_id })?;
        debug!(
            %session_id,
            minutes = duration.minutes,
            source = ?duration.source,
            raw_records = records.len(),
            "Meeting duration resolved"
        );

        advance(stage, ReconcileStage::Grouping, session_id);
        let groups = group_participants(records);

        advance(stage, ReconcileStage::ResolvingIdentities, session_id);
        let resolved = resolve_user_ids(self.directory.as_ref(), groups, meeting_end).await?;

        advance(stage, ReconcileStage::Merging, session_id);
        let merged: Vec<(ResolvedParticipant, Vec<TimeSegment>)> = resolved
            .into_values()
            .map(|p| {
                let segments = merge_overlapping(&p.segments);
                (p, segments)
            })
            .collect();

        advance(stage, ReconcileStage::Calculating, session_id);
        let rows: Vec<(bool, NewAttendance)> = merged
            .into_iter()
            .filter_map(|(p, segments)| {
                build_attendance(session_id, &p, segments, duration).map(|row| (p.is_matched(), row))
            })
            .collect();

        advance(stage, ReconcileStage::Persisting, session_id);
        let removed = self.attendance.delete_for_session(session_id).await?;
        debug!(%session_id, removed, "Cleared previous attendance");

        let mut summary = ReconcileSummary {
            imported: 0,
            unmatched: 0,
            skipped: 0,
            duration_used: duration.minutes,
            duration_source: Some(duration.source),
        };
        for (matched, row) in &rows {
            match self.attendance.insert_attendance(row).await {
                Ok(_) if *matched => summary.imported += 1,
                Ok(_) => summary.unmatched += 1,
                Err(e) => {
                    summary.skipped += 1;
                    warn!(
                        %session_id,
                        identity = %row.resolved_email_or_name,
                        error = %e,
                        "Skipping attendance record that failed to persist"
                    );
                }
            }
        }

        if duration.source == DurationSource::Provider {
            if let Err(e) = self
                .sessions
                .record_actual_duration(session_id, duration.minutes)
                .await
            {
                warn!(%session_id, error = %e, "Failed to store provider meeting duration");
            }
        }

        Ok(summary)
    }
}

fn advance(stage: &mut ReconcileStage, next: ReconcileStage, session_id: ObjectId) {
    debug!(%session_id, from = ?*stage, to = ?next, "Reconciliation stage");
    *stage = next;
}

fn build_attendance(
    session_id: ObjectId,
    participant: &ResolvedParticipant,
    segments: Vec<TimeSegment>,
    duration: MeetingDuration,
) -> Option<NewAttendance> {
    let first_join_time = segments.first()?.join_time();
    let last_leave_time = segments.last()?.leave_time();
    let calc = calculate_attendance(&segments, duration.minutes);

    Some(NewAttendance {
        session_id,
        user_id: participant.user_id(),
        resolved_email_or_name: participant.email_or_name(),
        email: participant.email.clone(),
        display_name: participant.display_name.clone(),
        first_join_time,
        last_leave_time,
        total_duration_seconds: calc.total_seconds,
        attendance_percentage: calc.percentage,
        duration,
        segments,
    })
}
