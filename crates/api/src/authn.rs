//! Authentication collaborator: turns a bearer token into a [`Principal`].
//!
//! Credential checks, cookies and sessions live outside this service; the
//! gate only needs "who is calling and which claims do they hold".

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use claimgate_auth::{ClaimStore, Principal, StoreError, load_principal};
use claimgate_core::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthnError {
    #[error("unknown token")]
    UnknownToken,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Result<Principal, AuthnError>;
}

/// Fixed token → user map; claims are read from the store on every request so
/// changes (e.g. seeding) are visible without re-issuing tokens.
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, UserId>,
    store: Arc<dyn ClaimStore>,
}

impl StaticTokenAuthenticator {
    pub fn new(store: Arc<dyn ClaimStore>) -> Self {
        Self {
            tokens: HashMap::new(),
            store,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>, user_id: UserId) -> Self {
        self.tokens.insert(token.into(), user_id);
        self
    }
}

impl Authenticator for StaticTokenAuthenticator {
    fn authenticate(&self, token: &str) -> Result<Principal, AuthnError> {
        let user_id = self.tokens.get(token).copied().ok_or(AuthnError::UnknownToken)?;
        Ok(load_principal(self.store.as_ref(), user_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimgate_auth::{Claim, InMemoryClaimStore};

    #[test]
    fn resolves_known_tokens_with_current_claims() {
        let store = Arc::new(InMemoryClaimStore::new());
        let id = UserId::new();
        store.insert_user(id, "a@localhost").unwrap();

        let authn = StaticTokenAuthenticator::new(store.clone()).with_token("tok", id);
        assert!(authn.authenticate("tok").unwrap().claims().is_empty());

        store.add_claim(id, Claim::role("User")).unwrap();
        assert_eq!(authn.authenticate("tok").unwrap().first_claim_value("role"), Some("User"));
    }

    #[test]
    fn rejects_unknown_tokens() {
        let store = Arc::new(InMemoryClaimStore::new());
        let authn = StaticTokenAuthenticator::new(store);
        assert_eq!(authn.authenticate("nope").unwrap_err(), AuthnError::UnknownToken);
    }
}
