//! Temporal classification of events and series.
//!
//! Every instant is a `DateTime<Utc>`, so comparisons happen on a single
//! absolute timeline.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a span sits relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeBucket {
    Past,
    Ongoing,
    Upcoming,
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBucket::Past => write!(f, "past"),
            TimeBucket::Ongoing => write!(f, "ongoing"),
            TimeBucket::Upcoming => write!(f, "upcoming"),
        }
    }
}

/// Classify `now` against the half-open window `[start, end)`.
///
/// PAST is checked first: a zero-width window is UPCOMING before `start` and
/// PAST from `start` on, never ONGOING.
pub fn classify(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> TimeBucket {
    if now >= end {
        TimeBucket::Past
    } else if now < start {
        TimeBucket::Upcoming
    } else {
        TimeBucket::Ongoing
    }
}

/// The (start, end) pair used for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Span {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Span { start, end }
    }

    pub fn classify(&self, now: DateTime<Utc>) -> TimeBucket {
        classify(now, self.start, self.end)
    }

    /// True while `now` is inside `[start, end)`.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.classify(now) == TimeBucket::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, h, m, 0).unwrap()
    }

    #[test]
    fn test_classify_boundaries_are_half_open() {
        let start = at(14, 30);
        let end = start + Duration::minutes(90);

        assert_eq!(classify(at(14, 29), start, end), TimeBucket::Upcoming);
        assert_eq!(classify(start, start, end), TimeBucket::Ongoing);
        assert_eq!(classify(at(15, 0), start, end), TimeBucket::Ongoing);
        assert_eq!(classify(at(16, 0), start, end), TimeBucket::Past);
        assert_eq!(classify(at(17, 0), start, end), TimeBucket::Past);
    }

    #[test]
    fn test_zero_width_span_is_never_ongoing() {
        let span = Span::new(at(10, 0), at(10, 0));

        assert_eq!(span.classify(at(9, 59)), TimeBucket::Upcoming);
        assert_eq!(span.classify(at(10, 0)), TimeBucket::Past);
        assert!(!span.contains(at(10, 0)));
    }

    #[test]
    fn test_inverted_span_is_past_once_end_reached() {
        let span = Span::new(at(12, 0), at(11, 0));

        assert_eq!(span.classify(at(10, 0)), TimeBucket::Upcoming);
        assert_eq!(span.classify(at(11, 30)), TimeBucket::Past);
    }
}
