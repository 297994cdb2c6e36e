use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::ModelError;

/// A nanosecond-precision UTC instant, printed/parsed as RFC3339Nano.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeAnchor(DateTime<Utc>);

impl TimeAnchor {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn parse(text: &str) -> Result<Self, ModelError> {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| TimeAnchor(dt.with_timezone(&Utc)))
            .map_err(|_| ModelError::InvalidTimeAnchor {
                text: text.to_string(),
                reason: "not a valid RFC3339Nano timestamp",
            })
    }

    /// `true` iff `self` is not after `other` (i.e. `self <= other`).
    pub fn not_after(&self, other: &TimeAnchor) -> bool {
        self.0 <= other.0
    }

    /// `true` iff `self` is not before `other` (i.e. `self >= other`).
    pub fn not_before(&self, other: &TimeAnchor) -> bool {
        self.0 >= other.0
    }
}

impl fmt::Display for TimeAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Nanos, true))
    }
}

impl FromStr for TimeAnchor {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeAnchor::parse(s)
    }
}

/// Inclusive bound-merge: `lo := max(lo1, lo2)`, `hi := min(hi1, hi2)`;
/// either side absent on either input means unbounded on that side.
pub fn merge_bounds(
    a: (Option<TimeAnchor>, Option<TimeAnchor>),
    b: (Option<TimeAnchor>, Option<TimeAnchor>),
) -> (Option<TimeAnchor>, Option<TimeAnchor>) {
    let lo = match (a.0, b.0) {
        (Some(x), Some(y)) => Some(if x.not_before(&y) { x } else { y }),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    };
    let hi = match (a.1, b.1) {
        (Some(x), Some(y)) => Some(if x.not_after(&y) { x } else { y }),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    };
    (lo, hi)
}

/// Inclusive-on-both-ends window membership test (§3.2).
pub fn in_bounds(anchor: &TimeAnchor, lo: Option<&TimeAnchor>, hi: Option<&TimeAnchor>) -> bool {
    let lo_ok = lo.is_none_or(|lo| lo.not_after(anchor));
    let hi_ok = hi.is_none_or(|hi| hi.not_before(anchor));
    lo_ok && hi_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_rfc3339_nano() {
        let text = "2016-01-01T00:00:00.000000000-08:00";
        let anchor = TimeAnchor::parse(text).unwrap();
        let reprinted = anchor.to_string();
        assert_eq!(TimeAnchor::parse(&reprinted).unwrap(), anchor);
    }

    #[test]
    fn ordering_is_antisymmetric() {
        let a = TimeAnchor::parse("2016-01-01T00:00:00Z").unwrap();
        let b = TimeAnchor::parse("2016-02-01T00:00:00Z").unwrap();
        assert!(a < b);
        assert!(!(b < a));
    }

    #[test]
    fn bound_inclusion_is_closed() {
        let lo = TimeAnchor::parse("2016-01-01T00:00:00Z").unwrap();
        let hi = TimeAnchor::parse("2016-03-01T00:00:00Z").unwrap();
        assert!(in_bounds(&lo, Some(&lo), Some(&hi)));
        assert!(in_bounds(&hi, Some(&lo), Some(&hi)));
    }

    #[test]
    fn merge_takes_tightest_window() {
        let a_lo = TimeAnchor::parse("2016-01-01T00:00:00Z").unwrap();
        let b_lo = TimeAnchor::parse("2016-02-01T00:00:00Z").unwrap();
        let hi = TimeAnchor::parse("2016-03-01T00:00:00Z").unwrap();
        let (lo, _) = merge_bounds((Some(a_lo), Some(hi)), (Some(b_lo), None));
        assert_eq!(lo, Some(b_lo));
    }
}
