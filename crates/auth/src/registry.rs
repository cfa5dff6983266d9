//! Policy registry: built once at startup, read-only afterwards.
//!
//! Registration happens on [`PolicyRegistryBuilder`]; only the finished
//! [`PolicyRegistry`] is shared with request handlers, so there is no way to
//! register a policy at runtime.

use std::collections::HashMap;

use thiserror::Error;

use crate::requirement::Requirement;

/// A named, ordered set of requirements. Access is granted iff all hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    name: String,
    requirements: Vec<Requirement>,
}

impl Policy {
    pub fn new(name: impl Into<String>, requirements: Vec<Requirement>) -> Self {
        Self {
            name: name.into(),
            requirements,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("policy '{0}' is registered more than once")]
    DuplicatePolicy(String),
}

/// Startup-time collector of policies.
#[derive(Debug, Default)]
pub struct PolicyRegistryBuilder {
    policies: HashMap<String, Policy>,
    shadowed: Vec<String>,
}

impl PolicyRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`. A later registration under the same name replaces the
    /// earlier one entirely (last write wins); the name is remembered as
    /// shadowed.
    pub fn register_policy(
        &mut self,
        name: impl Into<String>,
        requirements: Vec<Requirement>,
    ) -> &mut Self {
        let name = name.into();
        let policy = Policy::new(name.clone(), requirements);
        if let Some(previous) = self.policies.insert(name.clone(), policy) {
            tracing::debug!(
                policy = %name,
                dropped_requirements = previous.requirements.len(),
                "policy re-registered; previous definition replaced"
            );
            if !self.shadowed.contains(&name) {
                self.shadowed.push(name);
            }
        }
        self
    }

    /// Finish registration. Shadowed names are logged, not rejected.
    pub fn build(self) -> PolicyRegistry {
        for name in &self.shadowed {
            tracing::warn!(
                policy = %name,
                "policy name registered more than once; only the last definition is in effect"
            );
        }
        tracing::info!(policies = self.policies.len(), "policy registry built");

        PolicyRegistry {
            policies: self.policies,
            shadowed: self.shadowed,
        }
    }

    /// Finish registration, refusing configurations that reuse a name.
    pub fn build_strict(self) -> Result<PolicyRegistry, RegistryError> {
        if let Some(name) = self.shadowed.first() {
            return Err(RegistryError::DuplicatePolicy(name.clone()));
        }
        Ok(self.build())
    }
}

/// Immutable policy-name → policy map, shared read-only across requests.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    policies: HashMap<String, Policy>,
    shadowed: Vec<String>,
}

impl PolicyRegistry {
    pub fn builder() -> PolicyRegistryBuilder {
        PolicyRegistryBuilder::new()
    }

    pub fn lookup_policy(&self, name: &str) -> Option<&Policy> {
        self.policies.get(name)
    }

    /// Registered names, sorted.
    pub fn policy_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.policies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Names whose earlier definitions were overwritten during startup, in the
    /// order the overwrites happened.
    pub fn shadowed_policies(&self) -> &[String] {
        &self.shadowed
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_registered_policy() {
        let mut builder = PolicyRegistry::builder();
        builder.register_policy("TestClaim", vec![Requirement::claim_value_equals("Test", "test_claim")]);
        let registry = builder.build();

        let policy = registry.lookup_policy("TestClaim").unwrap();
        assert_eq!(policy.name(), "TestClaim");
        assert_eq!(policy.requirements().len(), 1);
        assert!(registry.lookup_policy("testclaim").is_none());
        assert!(registry.lookup_policy("Missing").is_none());
    }

    #[test]
    fn duplicate_registration_last_write_wins() {
        let mut builder = PolicyRegistry::builder();
        builder
            .register_policy("IsAdminClaimAccess", vec![Requirement::claim_presence("RegisteredAt")])
            .register_policy(
                "IsAdminClaimAccess",
                vec![Requirement::claim_value_equals("IsAdmin", "true")],
            );
        let registry = builder.build();

        let policy = registry.lookup_policy("IsAdminClaimAccess").unwrap();
        assert_eq!(
            policy.requirements(),
            &[Requirement::claim_value_equals("IsAdmin", "true")]
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.shadowed_policies(), &["IsAdminClaimAccess".to_string()]);
    }

    #[test]
    fn repeated_shadowing_is_reported_once() {
        let mut builder = PolicyRegistry::builder();
        builder
            .register_policy("X", vec![])
            .register_policy("X", vec![Requirement::claim_presence("A")])
            .register_policy("X", vec![Requirement::claim_presence("B")]);
        let registry = builder.build();

        assert_eq!(registry.shadowed_policies(), &["X".to_string()]);
        assert_eq!(
            registry.lookup_policy("X").unwrap().requirements(),
            &[Requirement::claim_presence("B")]
        );
    }

    #[test]
    fn strict_build_rejects_duplicates() {
        let mut builder = PolicyRegistry::builder();
        builder
            .register_policy("A", vec![])
            .register_policy("B", vec![])
            .register_policy("A", vec![]);

        assert_eq!(
            builder.build_strict().unwrap_err(),
            RegistryError::DuplicatePolicy("A".to_string())
        );
    }

    #[test]
    fn strict_build_accepts_unique_names() {
        let mut builder = PolicyRegistry::builder();
        builder.register_policy("B", vec![]).register_policy("A", vec![]);
        let registry = builder.build_strict().unwrap();
        assert_eq!(registry.policy_names(), vec!["A", "B"]);
        assert!(registry.shadowed_policies().is_empty());
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PolicyRegistry>();
    }
}
