//! Timestamp value generators.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Generate a random timestamp in `[start, end]` with microsecond resolution.
///
/// If the range is empty or inverted, `start` is returned.
pub fn random_time_between<R: Rng>(
    rng: &mut R,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> DateTime<Utc> {
    let span = (end - start).num_microseconds().unwrap_or(i64::MAX);
    if span <= 0 {
        return start;
    }
    start + Duration::microseconds(rng.gen_range(0..=span))
}
