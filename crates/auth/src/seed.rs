//! Initial claim seeding.
//!
//! Runs once at startup against the external user store. A claim is only
//! added when the user holds no claim of that name yet, so re-running the seed
//! on every boot never re-stamps values such as the registration time.

use chrono::Duration;
use serde::Serialize;

use claimgate_core::Timestamp;

use crate::claims::{Claim, REGISTERED_AT};
use crate::store::{ClaimStore, StoreError};

/// Claims to ensure for one account, identified by e-mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUser {
    pub email: String,
    pub claims: Vec<Claim>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub added: usize,
    pub skipped: usize,
    /// Seed entries whose e-mail is not registered in the store.
    pub missing_users: Vec<String>,
}

/// Ensure every seed user holds its seed claims.
pub fn seed_user_claims<S: ClaimStore + ?Sized>(
    store: &S,
    seeds: &[SeedUser],
) -> Result<SeedReport, StoreError> {
    let mut report = SeedReport::default();

    for seed in seeds {
        let Some(user_id) = store.user_by_email(&seed.email)? else {
            tracing::warn!(email = %seed.email, "seed user not registered; skipping");
            report.missing_users.push(seed.email.clone());
            continue;
        };

        let mut existing = store.claims(user_id)?;
        for claim in &seed.claims {
            if existing.iter().any(|c| c.name == claim.name) {
                report.skipped += 1;
                continue;
            }
            store.add_claim(user_id, claim.clone())?;
            existing.push(claim.clone());
            report.added += 1;
        }
    }

    tracing::info!(
        added = report.added,
        skipped = report.skipped,
        missing = report.missing_users.len(),
        "seeded initial user claims"
    );

    Ok(report)
}

/// Seed set of the identity scaffold: one administrator, one employee.
///
/// The administrator's registration is back-dated so it clears the default
/// account-age policy; the employee's is fresh.
pub fn default_seed_users(now: Timestamp) -> Vec<SeedUser> {
    vec![
        SeedUser {
            email: "admin@localhost".to_string(),
            claims: vec![
                Claim::role("Admin"),
                Claim::new("IsAdmin", "true"),
                Claim::new(REGISTERED_AT, (now - Duration::days(30)).to_rfc3339()),
            ],
        },
        SeedUser {
            email: "employee@localhost".to_string(),
            claims: vec![
                Claim::role("User"),
                Claim::new("IsEmployee", "true"),
                Claim::registered_at(now),
            ],
        },
    ]
}
