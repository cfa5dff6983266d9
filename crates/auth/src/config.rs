//! Declarative policy configuration.
//!
//! The configuration is a plain list of `{name, requirements}` entries, each
//! requirement tagged by `kind`. It is read once at startup and turned into a
//! [`PolicyRegistry`].

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::claims::REGISTERED_AT;
use crate::registry::{PolicyRegistry, PolicyRegistryBuilder, RegistryError};
use crate::requirement::Requirement;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read policy file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid policy configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("policy '{policy}': account age threshold must not be negative")]
    NegativeThreshold { policy: String },

    #[error("policy '{policy}': account age threshold is out of range")]
    ThresholdOutOfRange { policy: String },

    #[error("policy '{policy}': role membership requires at least one role")]
    EmptyRoleList { policy: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Account-age threshold; components are summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdSpec {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl ThresholdSpec {
    pub fn days(days: i64) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    fn total_seconds(&self) -> Option<i64> {
        self.days
            .checked_mul(86_400)?
            .checked_add(self.hours.checked_mul(3_600)?)?
            .checked_add(self.minutes.checked_mul(60)?)?
            .checked_add(self.seconds)
    }

    fn to_duration(self, policy: &str) -> Result<Duration, ConfigError> {
        let out_of_range = || ConfigError::ThresholdOutOfRange {
            policy: policy.to_string(),
        };
        let secs = self.total_seconds().ok_or_else(out_of_range)?;
        if secs < 0 {
            return Err(ConfigError::NegativeThreshold {
                policy: policy.to_string(),
            });
        }
        Duration::try_seconds(secs).ok_or_else(out_of_range)
    }
}

/// One requirement descriptor as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequirementSpec {
    RoleMembership { roles: Vec<String> },
    ClaimPresence { claim: String },
    ClaimValueEquals { claim: String, value: String },
    MinimumAccountAge { threshold: ThresholdSpec },
}

impl RequirementSpec {
    fn to_requirement(&self, policy: &str) -> Result<Requirement, ConfigError> {
        Ok(match self {
            RequirementSpec::RoleMembership { roles } => {
                if roles.is_empty() {
                    return Err(ConfigError::EmptyRoleList {
                        policy: policy.to_string(),
                    });
                }
                Requirement::role_membership(roles.iter().cloned())
            }
            RequirementSpec::ClaimPresence { claim } => Requirement::claim_presence(claim.clone()),
            RequirementSpec::ClaimValueEquals { claim, value } => {
                Requirement::claim_value_equals(claim.clone(), value.clone())
            }
            RequirementSpec::MinimumAccountAge { threshold } => {
                Requirement::minimum_account_age(threshold.to_duration(policy)?)
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDefinition {
    pub name: String,
    #[serde(default)]
    pub requirements: Vec<RequirementSpec>,
}

/// The whole startup configuration, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub policies: Vec<PolicyDefinition>,
}

impl PolicyConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Built-in policies of the identity scaffold, with English policy and
    /// claim names (`Manager`, `IsEmployee`, `RegisteredAt`, `Test`,
    /// `MinimumAccountAge`). Stores holding the scaffold's own claim names
    /// need a JSON policy file instead.
    ///
    /// Note: `IsAdminClaimAccess` is declared twice, exactly as in the
    /// scaffold's startup block. Under last-write-wins only the `IsAdmin`
    /// value check survives and the registration-claim check is lost.
    pub fn default_policies() -> Self {
        fn policy(name: &str, requirements: Vec<RequirementSpec>) -> PolicyDefinition {
            PolicyDefinition {
                name: name.to_string(),
                requirements,
            }
        }

        Self {
            policies: vec![
                policy(
                    "RequireUserAdminManagerRole",
                    vec![RequirementSpec::RoleMembership {
                        roles: vec!["User".into(), "Admin".into(), "Manager".into()],
                    }],
                ),
                policy(
                    "IsAdminClaimAccess",
                    vec![RequirementSpec::ClaimPresence {
                        claim: REGISTERED_AT.to_string(),
                    }],
                ),
                policy(
                    "IsAdminClaimAccess",
                    vec![RequirementSpec::ClaimValueEquals {
                        claim: "IsAdmin".into(),
                        value: "true".into(),
                    }],
                ),
                policy(
                    "IsEmployeeClaimAccess",
                    vec![RequirementSpec::ClaimValueEquals {
                        claim: "IsEmployee".into(),
                        value: "true".into(),
                    }],
                ),
                policy(
                    "MinimumAccountAge",
                    vec![RequirementSpec::MinimumAccountAge {
                        threshold: ThresholdSpec::days(5),
                    }],
                ),
                policy(
                    "TestClaim",
                    vec![RequirementSpec::ClaimValueEquals {
                        claim: "Test".into(),
                        value: "test_claim".into(),
                    }],
                ),
            ],
        }
    }

    fn into_builder(self) -> Result<PolicyRegistryBuilder, ConfigError> {
        let mut builder = PolicyRegistry::builder();
        for def in self.policies {
            if def.requirements.is_empty() {
                tracing::warn!(
                    policy = %def.name,
                    "policy declares no requirements and will grant every principal"
                );
            }
            let requirements = def
                .requirements
                .iter()
                .map(|spec| spec.to_requirement(&def.name))
                .collect::<Result<Vec<_>, _>>()?;
            builder.register_policy(def.name, requirements);
        }
        Ok(builder)
    }

    /// Build the registry; duplicate names follow last-write-wins.
    pub fn into_registry(self) -> Result<PolicyRegistry, ConfigError> {
        Ok(self.into_builder()?.build())
    }

    /// Build the registry, rejecting duplicate names.
    pub fn into_registry_strict(self) -> Result<PolicyRegistry, ConfigError> {
        Ok(self.into_builder()?.build_strict()?)
    }
}
