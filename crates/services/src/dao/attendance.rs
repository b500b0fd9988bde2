use std::collections::HashMap;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use tracing::{debug, warn};
use cohort_db::models::{AttendanceRecord, AttendanceSegment};

use super::base::{BaseDao, DaoResult};
use crate::attendance::{AttendanceStore, NewAttendance};

pub struct AttendanceDao {
    pub records: BaseDao<AttendanceRecord>,
    pub segments: BaseDao<AttendanceSegment>,
}

/// A stored record together with its ordered segments.
#[derive(Debug, Clone)]
pub struct AttendanceWithSegments {
    pub record: AttendanceRecord,
    pub segments: Vec<AttendanceSegment>,
}

impl AttendanceDao {
    pub fn new(db: &Database) -> Self {
        Self {
            records: BaseDao::new(db, AttendanceRecord::COLLECTION),
            segments: BaseDao::new(db, AttendanceSegment::COLLECTION),
        }
    }

    pub async fn list_for_session(
        &self,
        session_id: ObjectId,
    ) -> DaoResult<Vec<AttendanceWithSegments>> {
        let records = self
            .records
            .find_many(
                doc! { "session_id": session_id },
                Some(doc! { "resolved_email_or_name": 1, "_id": 1 }),
            )
            .await?;
        let segments = self
            .segments
            .find_many(
                doc! { "session_id": session_id },
                Some(doc! { "attendance_id": 1, "position": 1 }),
            )
            .await?;

        let mut by_record: HashMap<ObjectId, Vec<AttendanceSegment>> = HashMap::new();
        for segment in segments {
            by_record.entry(segment.attendance_id).or_default().push(segment);
        }

        Ok(records
            .into_iter()
            .map(|record| {
                let segments = record
                    .id
                    .and_then(|id| by_record.remove(&id))
                    .unwrap_or_default();
                AttendanceWithSegments { record, segments }
            })
            .collect())
    }
}

#[async_trait]
impl AttendanceStore for AttendanceDao {
    async fn delete_for_session(&self, session_id: ObjectId) -> DaoResult<u64> {
        let segments = self
            .segments
            .hard_delete(doc! { "session_id": session_id })
            .await?;
        let records = self
            .records
            .hard_delete(doc! { "session_id": session_id })
            .await?;
        debug!(%session_id, records, segments, "Deleted attendance");
        Ok(records)
    }

    async fn insert_attendance(&self, attendance: &NewAttendance) -> DaoResult<ObjectId> {
        let now = DateTime::now();
        let record = AttendanceRecord {
            id: None,
            session_id: attendance.session_id,
            user_id: attendance.user_id,
            resolved_email_or_name: attendance.resolved_email_or_name.clone(),
            email: attendance.email.clone(),
            display_name: attendance.display_name.clone(),
            first_join_time: DateTime::from_chrono(attendance.first_join_time),
            last_leave_time: DateTime::from_chrono(attendance.last_leave_time),
            total_duration_seconds: attendance.total_duration_seconds,
            attendance_percentage: attendance.attendance_percentage,
            duration_minutes_used: attendance.duration.minutes,
            duration_source: attendance.duration.source,
            created_at: now,
        };
        let attendance_id = self.records.insert_one(&record).await?;

        let segments: Vec<AttendanceSegment> = attendance
            .segments
            .iter()
            .zip(0u32..)
            .map(|(segment, position)| AttendanceSegment {
                id: None,
                attendance_id,
                session_id: attendance.session_id,
                position,
                join_time: DateTime::from_chrono(segment.join_time()),
                leave_time: DateTime::from_chrono(segment.leave_time()),
                duration_seconds: segment.duration_seconds(),
            })
            .collect();

        if let Err(e) = self.segments.insert_many(&segments).await {
            // Keep the record/segments pair all-or-nothing.
            if let Err(cleanup) = self
                .records
                .hard_delete(doc! { "_id": attendance_id })
                .await
            {
                warn!(%attendance_id, error = %cleanup, "Failed to remove orphaned attendance record");
            }
            return Err(e);
        }

        Ok(attendance_id)
    }
}
