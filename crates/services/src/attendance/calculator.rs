use super::segments::total_seconds;
use super::types::{AttendanceCalculation, TimeSegment};

/// Computes connected time and its share of the meeting.
///
/// `segments` must already be merged and `meeting_minutes` must be positive;
/// the duration resolver guarantees the latter.
pub fn calculate_attendance(segments: &[TimeSegment], meeting_minutes: u32) -> AttendanceCalculation {
    let total_seconds = total_seconds(segments);

    AttendanceCalculation {
        total_seconds,
        percentage: round_percentage(total_seconds, meeting_minutes),
    }
}

/// `seconds / (meeting_minutes * 60)` as a percentage, rounded half up to two
/// decimals and capped at 100. The division is exact, so midpoints such as
/// 14.375 round up. A zero-length meeting yields 0.
pub fn round_percentage(seconds: i64, meeting_minutes: u32) -> f64 {
    let denominator = i128::from(meeting_minutes) * 60;
    if denominator == 0 {
        return 0.0;
    }
    let numerator = i128::from(seconds.max(0)) * 10_000;
    let hundredths = ((2 * numerator + denominator) / (2 * denominator)).clamp(0, 10_000);
    hundredths as f64 / 100.0
}
