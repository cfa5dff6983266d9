//! Time-since-registration requirement.
//!
//! Unlike the literal claim matches, this one derives its answer from the
//! registration timestamp claim and the supplied "now". It fails closed: a
//! missing, unparsable or future timestamp never satisfies it.

use chrono::Duration;

use claimgate_core::Timestamp;

use crate::claims::{ClaimTimestamp, REGISTERED_AT};
use crate::principal::Principal;
use crate::requirement::{DenialKind, Requirement, RequirementOutcome};

/// Time elapsed since registration, or `None` if the claim is unusable.
pub fn account_age(principal: &Principal, now: Timestamp) -> Option<Duration> {
    principal
        .claim_as_timestamp(REGISTERED_AT)
        .map(|registered_at| now - registered_at)
}

pub(crate) fn check(
    requirement: &Requirement,
    principal: &Principal,
    now: Timestamp,
    threshold: Duration,
) -> RequirementOutcome {
    let registered_at = match principal.claim_timestamp(REGISTERED_AT) {
        ClaimTimestamp::Valid(ts) => ts,
        ClaimTimestamp::Missing => {
            return RequirementOutcome::denied(
                requirement,
                DenialKind::MissingRegistration,
                format!("claim '{REGISTERED_AT}' is not present"),
            );
        }
        ClaimTimestamp::Malformed(raw) => {
            tracing::warn!(
                principal_id = %principal.id(),
                claim = REGISTERED_AT,
                value = %raw,
                "malformed registration timestamp; treating requirement as not satisfied"
            );
            return RequirementOutcome::denied(
                requirement,
                DenialKind::MalformedClaimValue,
                format!("claim '{REGISTERED_AT}' is not a valid timestamp: '{raw}'"),
            );
        }
    };

    let age = now - registered_at;
    if age >= Duration::zero() && age >= threshold {
        RequirementOutcome::satisfied(requirement)
    } else {
        RequirementOutcome::denied(
            requirement,
            DenialKind::AccountTooNew,
            format!(
                "account registered {}s ago, {}s required",
                age.num_seconds(),
                threshold.num_seconds()
            ),
        )
    }
}
