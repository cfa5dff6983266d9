use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use claimgate_auth::AuthzError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// End-user facing denial.
pub fn access_denied(policy: &str) -> axum::response::Response {
    json_error(
        StatusCode::FORBIDDEN,
        "access_denied",
        format!("access denied by policy '{policy}'"),
    )
}

/// Map an authorization error at a gated route.
///
/// A missing policy is a deployment fault: it is logged loudly and reported as
/// a server error, never as a denial.
pub fn authz_error_to_response(err: AuthzError) -> axum::response::Response {
    match err {
        AuthzError::PolicyNotFound(policy) => {
            tracing::error!(policy = %policy, "route requires a policy that is not configured");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "policy_misconfigured",
                "authorization policy is not configured",
            )
        }
        AuthzError::Denied { policy, .. } => access_denied(&policy),
    }
}
