use super::types::TimeSegment;

/// Collapses overlapping or touching intervals into the minimal sorted set
/// of disjoint intervals covering the same time.
pub fn merge_overlapping(segments: &[TimeSegment]) -> Vec<TimeSegment> {
    if segments.len() <= 1 {
        return segments.to_vec();
    }

    let mut sorted = segments.to_vec();
    sorted.sort_by_key(|s| (s.join_time(), s.leave_time()));

    let mut merged: Vec<TimeSegment> = Vec::with_capacity(sorted.len());
    for segment in sorted {
        match merged.last_mut() {
            Some(last) if segment.join_time() <= last.leave_time() => {
                last.extend_to(segment.leave_time());
            }
            _ => merged.push(segment),
        }
    }
    merged
}

/// Sum of segment durations in seconds.
pub fn total_seconds(segments: &[TimeSegment]) -> i64 {
    segments.iter().map(TimeSegment::duration_seconds).sum()
}
