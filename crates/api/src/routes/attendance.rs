use axum::{Json, extract::{Path, State}};
use bson::oid::ObjectId;
use cohort_services::attendance::{DurationSource, ReconcileError, ReconcileSummary};
use cohort_services::dao::attendance::AttendanceWithSegments;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::parse_id;
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ImportAttendanceRequest {
    #[validate(length(min = 1, message = "meeting_id must not be empty"))]
    pub meeting_id: Option<String>,
    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct RecalculateAttendanceRequest {
    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SegmentResponse {
    pub join_time: String,
    pub leave_time: String,
    pub duration_seconds: i64,
}

#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    pub id: String,
    pub user_id: Option<String>,
    pub resolved_email_or_name: String,
    pub email: Option<String>,
    pub display_name: String,
    pub first_join_time: String,
    pub last_leave_time: String,
    pub total_duration_seconds: i64,
    pub attendance_percentage: f64,
    pub duration_minutes_used: u32,
    pub duration_source: DurationSource,
    pub segments: Vec<SegmentResponse>,
}

pub async fn import(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
    body: Option<Json<ImportAttendanceRequest>>,
) -> Result<Json<ReconcileSummary>, ApiError> {
    let sid = parse_id(&session_id, "session_id")?;
    auth.require_admin(&state).await?;

    let body = body.map(|Json(b)| b).unwrap_or_default();
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let summary = run(&state, sid, body.meeting_id, body.duration_minutes).await?;
    Ok(Json(summary))
}

pub async fn recalculate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
    body: Option<Json<RecalculateAttendanceRequest>>,
) -> Result<Json<ReconcileSummary>, ApiError> {
    let sid = parse_id(&session_id, "session_id")?;
    auth.require_admin(&state).await?;

    let body = body.map(|Json(b)| b).unwrap_or_default();
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let summary = run(&state, sid, None, body.duration_minutes).await?;
    Ok(Json(summary))
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<AttendanceResponse>>, ApiError> {
    let sid = parse_id(&session_id, "session_id")?;
    auth.require_admin(&state).await?;

    state.sessions.base.find_by_id(sid).await?;
    let rows = state.attendance.list_for_session(sid).await?;

    Ok(Json(rows.into_iter().map(to_response).collect()))
}

async fn run(
    state: &AppState,
    session_id: ObjectId,
    meeting_id: Option<String>,
    duration_minutes: Option<u32>,
) -> Result<ReconcileSummary, ApiError> {
    let session = state.sessions.base.find_by_id(session_id).await?;
    let meeting_id = meeting_id
        .or(session.zoom_meeting_id)
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Session has no meeting id".to_string()))?;

    let provider = state
        .provider
        .connect()
        .await
        .map_err(ReconcileError::from)?;

    let summary = state
        .reconciler
        .reconcile_session_attendance(provider.as_ref(), session_id, &meeting_id, duration_minutes)
        .await?;

    info!(
        %session_id,
        meeting_id = %meeting_id,
        imported = summary.imported,
        unmatched = summary.unmatched,
        skipped = summary.skipped,
        "Attendance reconciled"
    );
    Ok(summary)
}

fn to_response(row: AttendanceWithSegments) -> AttendanceResponse {
    let AttendanceWithSegments { record, segments } = row;
    AttendanceResponse {
        id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
        user_id: record.user_id.map(|id| id.to_hex()),
        resolved_email_or_name: record.resolved_email_or_name,
        email: record.email,
        display_name: record.display_name,
        first_join_time: record.first_join_time.try_to_rfc3339_string().unwrap_or_default(),
        last_leave_time: record.last_leave_time.try_to_rfc3339_string().unwrap_or_default(),
        total_duration_seconds: record.total_duration_seconds,
        attendance_percentage: record.attendance_percentage,
        duration_minutes_used: record.duration_minutes_used,
        duration_source: record.duration_source,
        segments: segments
            .into_iter()
            .map(|s| SegmentResponse {
                join_time: s.join_time.try_to_rfc3339_string().unwrap_or_default(),
                leave_time: s.leave_time.try_to_rfc3339_string().unwrap_or_default(),
                duration_seconds: s.duration_seconds,
            })
            .collect(),
    }
}
