//! Service wiring: policy registry, claim store, authenticator.

use std::sync::Arc;

use anyhow::Context;

use claimgate_auth::{
    ClaimStore, InMemoryClaimStore, PolicyConfig, PolicyEvaluator, PolicyRegistry,
    default_seed_users, seed_user_claims,
};
use claimgate_core::{Clock, UserId};

use crate::authn::{Authenticator, StaticTokenAuthenticator};
use crate::config::ApiConfig;

/// Shared, read-only services handed to every request.
#[derive(Clone)]
pub struct AppServices {
    pub evaluator: PolicyEvaluator,
    pub clock: Arc<dyn Clock>,
    pub store: Arc<dyn ClaimStore>,
}

/// Load the policy configuration and build the registry exactly once.
pub fn load_registry(config: &ApiConfig) -> anyhow::Result<PolicyRegistry> {
    let policies = match &config.policy_file {
        Some(path) => PolicyConfig::from_path(path)
            .with_context(|| format!("loading policies from {}", path.display()))?,
        None => {
            tracing::info!("CLAIMGATE_POLICY_FILE not set; using built-in policies");
            PolicyConfig::default_policies()
        }
    };

    let registry = if config.strict_policies {
        policies.into_registry_strict()?
    } else {
        policies.into_registry()?
    };

    Ok(registry)
}

/// In-memory wiring for local runs and tests: registers one account per dev
/// token, seeds the initial claims and issues the tokens.
pub fn build_dev_services(
    config: &ApiConfig,
    registry: PolicyRegistry,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<(AppServices, Arc<dyn Authenticator>)> {
    let memory = Arc::new(InMemoryClaimStore::new());
    let store: Arc<dyn ClaimStore> = memory.clone();

    let mut authenticator = StaticTokenAuthenticator::new(store.clone());
    for dev in &config.dev_tokens {
        let user_id = match memory.user_by_email(&dev.email)? {
            Some(id) => id,
            None => {
                let id = UserId::new();
                memory.insert_user(id, dev.email.clone())?;
                id
            }
        };
        authenticator = authenticator.with_token(dev.token.clone(), user_id);
    }

    seed_user_claims(store.as_ref(), &default_seed_users(clock.now()))?;

    let services = AppServices {
        evaluator: PolicyEvaluator::new(Arc::new(registry)),
        clock,
        store,
    };

    Ok((services, Arc::new(authenticator)))
}
