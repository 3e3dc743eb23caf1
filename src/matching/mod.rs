//! Closed-interval overlap matching on an absolute timeline.
//!
//! Predicted excerpt windows and annotation intervals are compared as
//! closed intervals of absolute timestamps. Overlap is counted in
//! whole seconds, inclusive of both endpoints, so intervals that
//! merely touch still register one unit of overlap and count as a
//! match.

use chrono::{NaiveDateTime, TimeDelta};

/// A closed interval on the absolute timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Interval start.
    pub start: NaiveDateTime,
    /// Interval end.
    pub end: NaiveDateTime,
}

impl TimeRange {
    /// Build a range from an anchor time plus start/end second offsets.
    pub fn from_offsets(anchor: NaiveDateTime, start_s: f64, end_s: f64) -> Self {
        Self {
            start: add_seconds(anchor, start_s),
            end: add_seconds(anchor, end_s),
        }
    }
}

/// Add fractional seconds to a timestamp, at millisecond resolution.
pub fn add_seconds(t: NaiveDateTime, seconds: f64) -> NaiveDateTime {
    #[allow(clippy::cast_possible_truncation)]
    let ms = (seconds * 1000.0).round() as i64;
    t + TimeDelta::milliseconds(ms)
}

/// Fractional seconds from `from` to `to`, at millisecond resolution.
#[allow(clippy::cast_precision_loss)]
pub fn seconds_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

/// Whole-second overlap between two closed intervals.
///
/// `max(0, floor_seconds(min(ends) - max(starts)) + 1)`: symmetric,
/// zero for disjoint intervals, and at least one for touching ones.
pub fn whole_second_overlap(r1: TimeRange, r2: TimeRange) -> i64 {
    let latest_start = r1.start.max(r2.start);
    let earliest_end = r1.end.min(r2.end);
    // Floor division keeps sub-second negative gaps negative instead of
    // truncating them to zero.
    let whole_seconds = (earliest_end - latest_start).num_milliseconds().div_euclid(1000);
    (whole_seconds + 1).max(0)
}

/// Find the first candidate interval overlapping the query.
///
/// Matching is first-hit in candidate order, not best-overlap: when
/// the query spans several candidates, the earliest row in the
/// candidate sequence wins. Returns the index of the match, or `None`
/// when nothing overlaps (a valid outcome, not an error).
pub fn find_overlap(query: TimeRange, candidates: &[TimeRange]) -> Option<usize> {
    candidates
        .iter()
        .position(|candidate| whole_second_overlap(query, *candidate) > 0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(seconds: f64) -> NaiveDateTime {
        let base = NaiveDate::from_ymd_opt(2022, 5, 16)
            .unwrap()
            .and_hms_opt(5, 30, 0)
            .unwrap();
        add_seconds(base, seconds)
    }

    fn range(start_s: f64, end_s: f64) -> TimeRange {
        TimeRange {
            start: at(start_s),
            end: at(end_s),
        }
    }

    #[test]
    fn test_overlap_symmetry() {
        let r1 = range(10.0, 20.0);
        let r2 = range(5.0, 12.0);
        assert_eq!(whole_second_overlap(r1, r2), whole_second_overlap(r2, r1));
    }

    #[test]
    fn test_overlap_positive_for_intersecting() {
        assert!(whole_second_overlap(range(10.0, 20.0), range(5.0, 12.0)) > 0);
    }

    #[test]
    fn test_overlap_zero_for_disjoint() {
        assert_eq!(whole_second_overlap(range(100.0, 110.0), range(0.0, 10.0)), 0);
        assert_eq!(whole_second_overlap(range(0.0, 10.0), range(100.0, 110.0)), 0);
    }

    #[test]
    fn test_touching_intervals_count_as_overlap() {
        assert_eq!(whole_second_overlap(range(0.0, 10.0), range(10.0, 20.0)), 1);
    }

    #[test]
    fn test_subsecond_gap_does_not_overlap() {
        // 400 ms of daylight between the intervals.
        assert_eq!(whole_second_overlap(range(0.0, 9.8), range(10.2, 20.0)), 0);
    }

    #[test]
    fn test_subsecond_intersection_counts() {
        assert!(whole_second_overlap(range(0.0, 10.2), range(9.8, 20.0)) > 0);
    }

    #[test]
    fn test_find_overlap_first_hit_wins() {
        let query = range(10.0, 20.0);
        let candidates = vec![range(5.0, 12.0), range(15.0, 25.0)];
        // The second candidate overlaps more, the first still wins.
        assert_eq!(find_overlap(query, &candidates), Some(0));
    }

    #[test]
    fn test_find_overlap_none() {
        let query = range(100.0, 110.0);
        let candidates = vec![range(0.0, 10.0), range(20.0, 30.0)];
        assert_eq!(find_overlap(query, &candidates), None);
    }

    #[test]
    fn test_from_offsets_and_seconds_between() {
        let anchor = at(0.0);
        let r = TimeRange::from_offsets(anchor, 2.5, 7.0);
        assert_eq!(seconds_between(anchor, r.start), 2.5);
        assert_eq!(seconds_between(anchor, r.end), 7.0);
    }
}
