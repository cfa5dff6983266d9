use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use claimgate_core::{Timestamp, UserId};

use crate::principal::Principal;
use crate::registry::{Policy, PolicyRegistry};
use crate::requirement::RequirementOutcome;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// The requested policy is not configured. This is a deployment fault, not
    /// a denial, and must reach operators rather than end users.
    #[error("policy not found: '{0}'")]
    PolicyNotFound(String),

    /// The policy was evaluated and at least one requirement failed.
    #[error("access denied by policy '{policy}': {failed} requirement(s) not satisfied")]
    Denied { policy: String, failed: usize },
}

/// Full record of one policy evaluation.
///
/// `outcomes` holds one entry per requirement, in declaration order, even when
/// an earlier one already failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    pub policy: String,
    pub principal_id: UserId,
    pub evaluated_at: Timestamp,
    pub succeeded: bool,
    pub outcomes: Vec<RequirementOutcome>,
}

impl EvaluationResult {
    pub fn failed_requirements(&self) -> impl Iterator<Item = &RequirementOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded)
    }
}

/// Evaluate an already-resolved policy.
///
/// - No IO
/// - No panics
/// - No short-circuit: every requirement is checked so the result (and the
///   logs) name every failing one
pub fn evaluate_policy(policy: &Policy, principal: &Principal, now: Timestamp) -> EvaluationResult {
    let outcomes: Vec<RequirementOutcome> = policy
        .requirements()
        .iter()
        .map(|req| req.check(principal, now))
        .collect();

    let succeeded = outcomes.iter().all(|o| o.succeeded);

    if policy.requirements().is_empty() {
        tracing::debug!(
            policy = %policy.name(),
            "policy has no requirements; granting unconditionally"
        );
    }

    let result = EvaluationResult {
        policy: policy.name().to_string(),
        principal_id: principal.id(),
        evaluated_at: now,
        succeeded,
        outcomes,
    };

    if succeeded {
        tracing::debug!(
            policy = %result.policy,
            principal_id = %result.principal_id,
            requirements = result.outcomes.len(),
            "policy satisfied"
        );
    } else {
        let failed: Vec<&str> = result
            .failed_requirements()
            .map(|o| o.requirement.as_str())
            .collect();
        tracing::info!(
            policy = %result.policy,
            principal_id = %result.principal_id,
            failed = ?failed,
            "policy denied"
        );
    }

    result
}

/// Evaluates named policies against a shared, read-only registry.
///
/// Cheap to clone; clones share the registry.
#[derive(Debug, Clone)]
pub struct PolicyEvaluator {
    registry: Arc<PolicyRegistry>,
}

impl PolicyEvaluator {
    pub fn new(registry: Arc<PolicyRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PolicyRegistry {
        &self.registry
    }

    /// Evaluate `policy_name` for `principal` at `now`.
    ///
    /// Denial is reported through `EvaluationResult::succeeded`; only an
    /// unknown policy name is an error.
    pub fn evaluate(
        &self,
        policy_name: &str,
        principal: &Principal,
        now: Timestamp,
    ) -> Result<EvaluationResult, AuthzError> {
        let policy = self
            .registry
            .lookup_policy(policy_name)
            .ok_or_else(|| AuthzError::PolicyNotFound(policy_name.to_string()))?;

        Ok(evaluate_policy(policy, principal, now))
    }

    /// Like [`evaluate`](Self::evaluate) but folds denial into the error.
    pub fn authorize(
        &self,
        policy_name: &str,
        principal: &Principal,
        now: Timestamp,
    ) -> Result<EvaluationResult, AuthzError> {
        let result = self.evaluate(policy_name, principal, now)?;
        if result.succeeded {
            Ok(result)
        } else {
            Err(AuthzError::Denied {
                policy: result.policy,
                failed: result.outcomes.iter().filter(|o| !o.succeeded).count(),
            })
        }
    }
}
