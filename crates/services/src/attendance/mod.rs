//! Attendance reconciliation: turns a completed meeting's participant log
//! into one attendance record per resolved identity.

pub mod calculator;
pub mod duration;
pub mod error;
pub mod grouper;
pub mod identity;
pub mod ports;
pub mod reconciler;
pub mod segments;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use calculator::{calculate_attendance, round_percentage};
pub use duration::{compute_meeting_end, resolve_meeting_duration};
pub use error::{ProviderError, ReconcileError};
pub use grouper::group_participants;
pub use identity::{normalize_email, resolve_identity, resolve_user_ids};
pub use ports::{AttendanceStore, IdentityDirectory, MeetingProvider, ProviderConnector, SessionStore};
pub use reconciler::{AttendanceReconciler, ReconcileStage};
pub use segments::merge_overlapping;
pub use types::*;
