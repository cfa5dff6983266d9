//! User/claim store boundary.
//!
//! Persistence is owned by an external user store; this crate only needs to
//! read a user's claims (to build a [`Principal`]) and append claims during
//! seeding. [`InMemoryClaimStore`] backs dev wiring and tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use claimgate_core::UserId;

use crate::claims::Claim;
use crate::principal::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("unknown user: {0}")]
    UnknownUser(UserId),

    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    #[error("claim store unavailable: {0}")]
    Unavailable(String),
}

pub trait ClaimStore: Send + Sync {
    fn user_by_email(&self, email: &str) -> Result<Option<UserId>, StoreError>;
    fn claims(&self, user_id: UserId) -> Result<Vec<Claim>, StoreError>;
    fn add_claim(&self, user_id: UserId, claim: Claim) -> Result<(), StoreError>;
}

impl<S> ClaimStore for Arc<S>
where
    S: ClaimStore + ?Sized,
{
    fn user_by_email(&self, email: &str) -> Result<Option<UserId>, StoreError> {
        (**self).user_by_email(email)
    }

    fn claims(&self, user_id: UserId) -> Result<Vec<Claim>, StoreError> {
        (**self).claims(user_id)
    }

    fn add_claim(&self, user_id: UserId, claim: Claim) -> Result<(), StoreError> {
        (**self).add_claim(user_id, claim)
    }
}

/// Snapshot a user's current claims into a [`Principal`].
pub fn load_principal<S: ClaimStore + ?Sized>(
    store: &S,
    user_id: UserId,
) -> Result<Principal, StoreError> {
    Ok(Principal::new(user_id, store.claims(user_id)?))
}

#[derive(Debug, Default)]
struct Users {
    by_email: HashMap<String, UserId>,
    claims: HashMap<UserId, Vec<Claim>>,
}

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryClaimStore {
    inner: RwLock<Users>,
}

impl InMemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user account with no claims.
    pub fn insert_user(&self, user_id: UserId, email: impl Into<String>) -> Result<(), StoreError> {
        let email = email.into();
        let mut users = self.write()?;
        if users.by_email.contains_key(&email) {
            return Err(StoreError::DuplicateEmail(email));
        }
        users.by_email.insert(email, user_id);
        users.claims.entry(user_id).or_default();
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Users>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Users>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

impl ClaimStore for InMemoryClaimStore {
    fn user_by_email(&self, email: &str) -> Result<Option<UserId>, StoreError> {
        Ok(self.read()?.by_email.get(email).copied())
    }

    fn claims(&self, user_id: UserId) -> Result<Vec<Claim>, StoreError> {
        self.read()?
            .claims
            .get(&user_id)
            .cloned()
            .ok_or(StoreError::UnknownUser(user_id))
    }

    fn add_claim(&self, user_id: UserId, claim: Claim) -> Result<(), StoreError> {
        let mut users = self.write()?;
        let claims = users
            .claims
            .get_mut(&user_id)
            .ok_or(StoreError::UnknownUser(user_id))?;
        claims.push(claim);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_round_through_principal() {
        let store = InMemoryClaimStore::new();
        let id = UserId::new();
        store.insert_user(id, "admin@localhost").unwrap();
        store.add_claim(id, Claim::role("Admin")).unwrap();
        store.add_claim(id, Claim::new("IsAdmin", "true")).unwrap();

        let principal = load_principal(&store, id).unwrap();
        assert_eq!(principal.id(), id);
        assert_eq!(principal.first_claim_value("role"), Some("Admin"));
        assert!(principal.has_claim_value("IsAdmin", "true"));
    }

    #[test]
    fn unknown_user_is_an_error() {
        let store = InMemoryClaimStore::new();
        let id = UserId::new();
        assert_eq!(load_principal(&store, id).unwrap_err(), StoreError::UnknownUser(id));
        assert_eq!(
            store.add_claim(id, Claim::role("User")).unwrap_err(),
            StoreError::UnknownUser(id)
        );
    }

    #[test]
    fn emails_are_unique() {
        let store = InMemoryClaimStore::new();
        store.insert_user(UserId::new(), "a@localhost").unwrap();
        assert_eq!(
            store.insert_user(UserId::new(), "a@localhost").unwrap_err(),
            StoreError::DuplicateEmail("a@localhost".to_string())
        );
    }

    #[test]
    fn lookup_by_email() {
        let store = InMemoryClaimStore::new();
        let id = UserId::new();
        store.insert_user(id, "a@localhost").unwrap();
        assert_eq!(store.user_by_email("a@localhost").unwrap(), Some(id));
        assert_eq!(store.user_by_email("b@localhost").unwrap(), None);
    }
}
