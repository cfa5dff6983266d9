//! Authorization transparency endpoints.
//!
//! These answer "why was this request denied?" for the calling principal
//! without exposing other users' claims.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use claimgate_auth::{AuthzError, Principal};

use crate::app::{AppServices, errors};

pub fn router() -> Router {
    Router::new()
        .route("/policies", get(list_policies))
        .route("/explain/:policy", get(explain))
}

/// GET /authz/policies - registered policy names and any shadowed at startup
pub async fn list_policies(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let registry = services.evaluator.registry();
    Json(serde_json::json!({
        "policies": registry.policy_names(),
        "shadowed": registry.shadowed_policies(),
    }))
}

/// GET /authz/explain/:policy - per-requirement outcomes for the caller
pub async fn explain(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(policy): Path<String>,
) -> axum::response::Response {
    match services
        .evaluator
        .evaluate(&policy, &principal, services.clock.now())
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(AuthzError::PolicyNotFound(name)) => errors::json_error(
            StatusCode::NOT_FOUND,
            "policy_not_found",
            format!("no policy named '{name}'"),
        ),
        Err(e) => errors::authz_error_to_response(e),
    }
}
