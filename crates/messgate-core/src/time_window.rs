//! Start/end windows over naive local date-times.
//!
//! Form fields may be empty or half-typed while an event is being authored,
//! so every bound is optional and every comparison is null-safe: an absent
//! operand never counts as a violated constraint.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// Accepted naive layouts, tried in order after RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a raw date-time string into a naive local instant.
///
/// Returns `None` for empty or unparseable input; never panics. Offsets on
/// RFC 3339 input are dropped and the wall-clock time of the string is kept.
pub fn parse_instant(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Returns true only when both instants are present and `a` is strictly before `b`.
pub fn is_before(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

/// A start/end pair where either end may be unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    /// Window start, if known.
    pub start: Option<NaiveDateTime>,
    /// Window end, if known.
    pub end: Option<NaiveDateTime>,
}

impl TimeWindow {
    /// Creates a window from already-parsed bounds.
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    /// Creates a window from two raw form strings.
    pub fn from_raw(start: &str, end: &str) -> Self {
        Self::new(parse_instant(start), parse_instant(end))
    }

    /// True when both ends are known.
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// False only when both ends are known and the end is not strictly after the start.
    pub fn is_well_ordered(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => end > start,
            _ => true,
        }
    }

    /// Length of the window when both ends are known.
    pub fn span(&self) -> Option<Duration> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Inclusive containment; unknown bounds and an unknown point do not constrain.
    pub fn contains(&self, point: Option<NaiveDateTime>) -> bool {
        !is_before(point, self.start) && !is_before(self.end, point)
    }

    /// True unless `inner` starts before `self` starts or ends after `self` ends.
    pub fn encloses(&self, inner: &TimeWindow) -> bool {
        !is_before(inner.start, self.start) && !is_before(self.end, inner.end)
    }
}
