//! `claimgate-auth` — claim-based authorization policies.
//!
//! This crate is intentionally decoupled from HTTP and storage: it consumes a
//! resolved [`Principal`] plus "now" and produces an [`EvaluationResult`].

pub mod account_age;
pub mod claims;
pub mod config;
pub mod evaluate;
pub mod principal;
pub mod registry;
pub mod requirement;
pub mod seed;
pub mod store;

pub use claims::{Claim, ClaimTimestamp, REGISTERED_AT, ROLE};
pub use config::{ConfigError, PolicyConfig, PolicyDefinition, RequirementSpec, ThresholdSpec};
pub use evaluate::{AuthzError, EvaluationResult, PolicyEvaluator, evaluate_policy};
pub use principal::Principal;
pub use registry::{Policy, PolicyRegistry, PolicyRegistryBuilder, RegistryError};
pub use requirement::{Denial, DenialKind, Requirement, RequirementOutcome};
pub use seed::{SeedReport, SeedUser, default_seed_users, seed_user_claims};
pub use store::{ClaimStore, InMemoryClaimStore, StoreError, load_principal};
