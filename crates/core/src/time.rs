//! Time primitives: the timestamp type, claim-value parsing and the clock seam.
//!
//! Authorization decisions take "now" as a plain input. Request layers obtain
//! it from a [`Clock`] so tests can pin time without touching the evaluator.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Point in time used across the workspace (always UTC).
pub type Timestamp = DateTime<Utc>;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a textual timestamp as stored in a claim value.
///
/// Accepts RFC 3339 (with offset), `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`
/// (optionally with fractional seconds) and bare `YYYY-MM-DD`. Values without an
/// offset are read as UTC. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Source of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Clock pinned to a single instant (tests, replays).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(Timestamp);

impl FixedClock {
    pub fn at(instant: Timestamp) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-03-01T12:00:00+02:00").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn parses_naive_forms_as_utc() {
        let a = parse_timestamp("2024-03-01 08:30:00").unwrap();
        let b = parse_timestamp("2024-03-01T08:30:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.hour(), 8);

        let c = parse_timestamp("2024-03-01T08:30:00.250").unwrap();
        assert_eq!(c.minute(), 30);
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        let ts = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(ts.hour(), 0);
        assert_eq!(ts.minute(), 0);
    }

    #[test]
    fn rejects_unparsable_values() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-45").is_none());
        assert!(parse_timestamp("01/03/2024").is_none());
    }

    #[test]
    fn fixed_clock_is_pinned() {
        let instant = Utc::now();
        let clock = FixedClock::at(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }
}
