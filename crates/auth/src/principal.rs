use serde::{Deserialize, Serialize};

use claimgate_core::{Timestamp, UserId, parse_timestamp};

use crate::claims::{Claim, ClaimTimestamp, ROLE};

/// An authenticated caller: an identifier plus the claims resolved for it.
///
/// Built by the authentication collaborator before evaluation starts and never
/// mutated afterwards; the evaluator only reads it through the accessors below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: UserId,
    claims: Vec<Claim>,
}

impl Principal {
    pub fn new(id: UserId, claims: impl IntoIterator<Item = Claim>) -> Self {
        Self {
            id,
            claims: claims.into_iter().collect(),
        }
    }

    /// Principal with no claims at all.
    pub fn anonymous(id: UserId) -> Self {
        Self::new(id, Vec::new())
    }

    /// Builder-style helper, mostly for tests and seeding.
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.push(Claim::new(name, value));
        self
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn has_claim(&self, name: &str) -> bool {
        self.claims.iter().any(|c| c.name == name)
    }

    /// All values held under `name`, in the order they were supplied.
    pub fn claim_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.claims
            .iter()
            .filter(move |c| c.name == name)
            .map(|c| c.value.as_str())
    }

    pub fn first_claim_value(&self, name: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    pub fn has_claim_value(&self, name: &str, value: &str) -> bool {
        self.claims.iter().any(|c| c.matches(name, value))
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> + '_ {
        self.claim_values(ROLE)
    }

    /// Read the first `name` claim as a timestamp, distinguishing absent from
    /// unparsable.
    pub fn claim_timestamp(&self, name: &str) -> ClaimTimestamp {
        match self.first_claim_value(name) {
            None => ClaimTimestamp::Missing,
            Some(raw) => match parse_timestamp(raw) {
                Some(ts) => ClaimTimestamp::Valid(ts),
                None => ClaimTimestamp::Malformed(raw.to_string()),
            },
        }
    }

    /// `None` if the claim is absent or unparsable. Never panics.
    pub fn claim_as_timestamp(&self, name: &str) -> Option<Timestamp> {
        self.claim_timestamp(name).valid()
    }
}
