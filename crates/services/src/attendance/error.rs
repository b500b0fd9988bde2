use bson::oid::ObjectId;
use thiserror::Error;

use crate::dao::base::DaoError;

/// Failure talking to the video-conferencing provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Provider authentication failed: {0}")]
    Auth(String),
    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),
}

/// Fatal errors of a reconciliation run. All of them are raised before any
/// existing attendance rows are deleted.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("No positive meeting duration could be resolved for session {session_id}")]
    DurationUnresolved { session_id: ObjectId },
    #[error("Failed to fetch participants: {0}")]
    ProviderFetch(#[from] ProviderError),
    #[error("Identity lookup failed: {0}")]
    IdentityLookup(DaoError),
    #[error("Session {0} not found")]
    SessionNotFound(ObjectId),
    #[error(transparent)]
    Dao(#[from] DaoError),
}
