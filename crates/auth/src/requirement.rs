//! Declarative requirements and their per-principal outcomes.

use std::collections::BTreeSet;

use chrono::Duration;
use serde::Serialize;

use claimgate_core::Timestamp;

use crate::account_age;
use crate::claims::ROLE;
use crate::principal::Principal;

/// A single predicate over a principal and the current time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// At least one `role` claim whose value is in the set (case-sensitive).
    RoleMembership { allowed_roles: BTreeSet<String> },
    /// The claim is present, whatever its value.
    ClaimPresence { claim: String },
    /// Some claim with this name carries exactly this value (case-sensitive).
    ClaimValueEquals { claim: String, value: String },
    /// The registration timestamp lies at least `threshold` before now.
    MinimumAccountAge { threshold: Duration },
}

impl Requirement {
    pub fn role_membership<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::RoleMembership {
            allowed_roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn claim_presence(claim: impl Into<String>) -> Self {
        Self::ClaimPresence { claim: claim.into() }
    }

    pub fn claim_value_equals(claim: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ClaimValueEquals {
            claim: claim.into(),
            value: value.into(),
        }
    }

    pub fn minimum_account_age(threshold: Duration) -> Self {
        Self::MinimumAccountAge { threshold }
    }

    pub fn is_satisfied(&self, principal: &Principal, now: Timestamp) -> bool {
        self.check(principal, now).succeeded
    }

    /// Evaluate this requirement and explain the result.
    pub fn check(&self, principal: &Principal, now: Timestamp) -> RequirementOutcome {
        match self {
            Requirement::RoleMembership { allowed_roles } => {
                if principal.roles().any(|r| allowed_roles.contains(r)) {
                    RequirementOutcome::satisfied(self)
                } else {
                    RequirementOutcome::denied(
                        self,
                        DenialKind::MissingRole,
                        format!(
                            "principal holds none of the roles {:?} (held: {:?})",
                            allowed_roles,
                            principal.claim_values(ROLE).collect::<Vec<_>>()
                        ),
                    )
                }
            }
            Requirement::ClaimPresence { claim } => {
                if principal.has_claim(claim) {
                    RequirementOutcome::satisfied(self)
                } else {
                    RequirementOutcome::denied(
                        self,
                        DenialKind::MissingClaim,
                        format!("claim '{claim}' is not present"),
                    )
                }
            }
            Requirement::ClaimValueEquals { claim, value } => {
                if principal.has_claim_value(claim, value) {
                    RequirementOutcome::satisfied(self)
                } else if principal.has_claim(claim) {
                    RequirementOutcome::denied(
                        self,
                        DenialKind::ClaimValueMismatch,
                        format!("no '{claim}' claim has the value '{value}'"),
                    )
                } else {
                    RequirementOutcome::denied(
                        self,
                        DenialKind::MissingClaim,
                        format!("claim '{claim}' is not present"),
                    )
                }
            }
            Requirement::MinimumAccountAge { threshold } => {
                account_age::check(self, principal, now, *threshold)
            }
        }
    }
}

impl core::fmt::Display for Requirement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Requirement::RoleMembership { allowed_roles } => {
                let roles: Vec<&str> = allowed_roles.iter().map(String::as_str).collect();
                write!(f, "role in [{}]", roles.join(", "))
            }
            Requirement::ClaimPresence { claim } => write!(f, "has claim '{claim}'"),
            Requirement::ClaimValueEquals { claim, value } => {
                write!(f, "claim '{claim}' == '{value}'")
            }
            Requirement::MinimumAccountAge { threshold } => {
                write!(f, "account age >= {}s", threshold.num_seconds())
            }
        }
    }
}

/// Why a requirement was not satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    MissingRole,
    MissingClaim,
    ClaimValueMismatch,
    MissingRegistration,
    MalformedClaimValue,
    AccountTooNew,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Denial {
    pub kind: DenialKind,
    pub message: String,
}

/// Outcome of evaluating one requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementOutcome {
    /// Human-readable form of the requirement that was checked.
    pub requirement: String,
    pub succeeded: bool,
    pub reason: Option<Denial>,
}

impl RequirementOutcome {
    pub(crate) fn satisfied(requirement: &Requirement) -> Self {
        Self {
            requirement: requirement.to_string(),
            succeeded: true,
            reason: None,
        }
    }

    pub(crate) fn denied(
        requirement: &Requirement,
        kind: DenialKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            requirement: requirement.to_string(),
            succeeded: false,
            reason: Some(Denial {
                kind,
                message: message.into(),
            }),
        }
    }

    pub fn denial_kind(&self) -> Option<DenialKind> {
        self.reason.as_ref().map(|r| r.kind)
    }
}
