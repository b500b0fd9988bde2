use std::collections::BTreeMap;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::error::ReconcileError;
use super::ports::IdentityDirectory;
use super::types::{GroupKey, RawParticipant, ResolvedKey, ResolvedParticipant, TimeSegment};

/// Trims and lowercases an email. Blank input yields `None`.
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Maps an email to a registered user, trying the primary address first and
/// the alias table second. No email never resolves.
pub async fn resolve_identity(
    directory: &dyn IdentityDirectory,
    email: Option<&str>,
) -> Result<Option<ObjectId>, ReconcileError> {
    let Some(email) = email.and_then(normalize_email) else {
        return Ok(None);
    };

    if let Some(user_id) = directory
        .resolve_user_by_email(&email)
        .await
        .map_err(ReconcileError::IdentityLookup)?
    {
        return Ok(Some(user_id));
    }

    let aliased = directory
        .resolve_user_by_alias(&email)
        .await
        .map_err(ReconcileError::IdentityLookup)?;
    if aliased.is_some() {
        debug!(%email, "Resolved participant through alias");
    }
    Ok(aliased)
}

/// Resolves every group to an identity and collapses groups that belong to
/// the same user. Missing leave times are filled with `meeting_end`.
pub async fn resolve_user_ids(
    directory: &dyn IdentityDirectory,
    groups: BTreeMap<GroupKey, Vec<RawParticipant>>,
    meeting_end: DateTime<Utc>,
) -> Result<BTreeMap<ResolvedKey, ResolvedParticipant>, ReconcileError> {
    let mut keyed: Vec<(ResolvedKey, RawParticipant)> = Vec::new();
    for (group_key, records) in groups {
        let key = match &group_key {
            GroupKey::Email(email) => match resolve_identity(directory, Some(email)).await? {
                Some(user_id) => ResolvedKey::Matched(user_id),
                None => ResolvedKey::Unmatched(group_key.clone()),
            },
            GroupKey::Guest(_) => ResolvedKey::Unmatched(group_key.clone()),
        };
        keyed.extend(records.into_iter().map(|record| (key.clone(), record)));
    }

    // Earliest join first, so the first record of a bucket is its representative.
    keyed.sort_by(|(_, a), (_, b)| {
        (a.join_time, &a.participant_id).cmp(&(b.join_time, &b.participant_id))
    });

    let mut resolved: BTreeMap<ResolvedKey, ResolvedParticipant> = BTreeMap::new();
    for (key, record) in keyed {
        let segment = TimeSegment::new(record.join_time, record.leave_time.unwrap_or(meeting_end));
        let email = record.email.as_deref().and_then(normalize_email);

        match resolved.get_mut(&key) {
            Some(bucket) => {
                bucket.segments.push(segment);
                if bucket.email.is_none() {
                    bucket.email = email;
                }
            }
            None => {
                resolved.insert(
                    key.clone(),
                    ResolvedParticipant {
                        key,
                        email,
                        display_name: record.display_name,
                        segments: vec![segment],
                    },
                );
            }
        }
    }

    Ok(resolved)
}
