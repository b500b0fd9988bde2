use std::collections::BTreeMap;

use super::identity::normalize_email;
use super::types::{GroupKey, RawParticipant};

/// Buckets raw connection events by normalized email, or by the event's own
/// participant id when it carries no email. Records keep their relative
/// order inside a bucket.
pub fn group_participants(
    records: Vec<RawParticipant>,
) -> BTreeMap<GroupKey, Vec<RawParticipant>> {
    let mut groups: BTreeMap<GroupKey, Vec<RawParticipant>> = BTreeMap::new();
    for record in records {
        let key = match record.email.as_deref().and_then(normalize_email) {
            Some(email) => GroupKey::Email(email),
            None => GroupKey::Guest(record.participant_id.clone()),
        };
        groups.entry(key).or_default().push(record);
    }
    groups
}
