//! API-side policy gate.
//!
//! Each protected route names one policy. The gate evaluates it for the
//! authenticated principal before the handler runs, keeping handlers and the
//! evaluator HTTP-agnostic.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use claimgate_auth::{AuthzError, EvaluationResult, PolicyEvaluator, Principal};
use claimgate_core::Clock;

use crate::app::errors;

#[derive(Clone)]
pub struct PolicyGate {
    evaluator: PolicyEvaluator,
    clock: Arc<dyn Clock>,
    policy: &'static str,
}

impl PolicyGate {
    pub fn new(evaluator: PolicyEvaluator, clock: Arc<dyn Clock>, policy: &'static str) -> Self {
        Self {
            evaluator,
            clock,
            policy,
        }
    }

    /// Evaluate the gate's policy for `principal` at the clock's current time.
    pub fn check(&self, principal: &Principal) -> Result<EvaluationResult, AuthzError> {
        self.evaluator.evaluate(self.policy, principal, self.clock.now())
    }
}

/// Middleware: run the route's policy; on success the [`EvaluationResult`] is
/// available to the handler as a request extension.
pub async fn policy_gate(State(gate): State<PolicyGate>, mut req: Request, next: Next) -> Response {
    let decision = match req.extensions().get::<Principal>() {
        Some(principal) => gate.check(principal),
        None => {
            return errors::json_error(
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "no authenticated principal",
            );
        }
    };

    match decision {
        Ok(result) if result.succeeded => {
            req.extensions_mut().insert(result);
            next.run(req).await
        }
        Ok(result) => errors::access_denied(&result.policy),
        Err(e) => errors::authz_error_to_response(e),
    }
}
