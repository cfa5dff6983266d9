use core::fmt;

use serde::{Deserialize, Serialize};

use claimgate_core::Timestamp;

/// Claim name carrying role membership (one claim per role).
pub const ROLE: &str = "role";

/// Claim name carrying the account registration timestamp.
pub const REGISTERED_AT: &str = "RegisteredAt";

/// A single name/value fact asserted about a principal.
///
/// Names and values are compared exactly (case-sensitive). A principal may hold
/// several claims with the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    pub name: String,
    pub value: String,
}

impl Claim {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Shorthand for a [`ROLE`] claim.
    pub fn role(role: impl Into<String>) -> Self {
        Self::new(ROLE, role)
    }

    /// Shorthand for a [`REGISTERED_AT`] claim in RFC 3339 form.
    pub fn registered_at(at: Timestamp) -> Self {
        Self::new(REGISTERED_AT, at.to_rfc3339())
    }

    /// Exact (case-sensitive) match on both name and value.
    pub fn matches(&self, name: &str, value: &str) -> bool {
        self.name == name && self.value == value
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Result of reading a claim as a timestamp.
///
/// Keeps "absent" and "present but unparsable" apart so callers can log the
/// latter as a data problem instead of a plain denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimTimestamp {
    Missing,
    Malformed(String),
    Valid(Timestamp),
}

impl ClaimTimestamp {
    pub fn valid(self) -> Option<Timestamp> {
        match self {
            ClaimTimestamp::Valid(ts) => Some(ts),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn role_shorthand_uses_role_claim_name() {
        let claim = Claim::role("Admin");
        assert_eq!(claim.name, ROLE);
        assert!(claim.matches("role", "Admin"));
        assert!(!claim.matches("role", "admin"));
    }

    #[test]
    fn registered_at_is_rfc3339() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let claim = Claim::registered_at(at);
        assert_eq!(claim.name, REGISTERED_AT);
        assert_eq!(claim.value, "2024-01-02T03:04:05+00:00");
    }

    #[test]
    fn display_is_name_equals_value() {
        assert_eq!(Claim::new("IsAdmin", "true").to_string(), "IsAdmin=true");
    }
}
