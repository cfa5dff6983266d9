//! Policy-gated areas. Each handler only runs after its policy passed, so the
//! handlers themselves hold no authorization logic.

use axum::{Json, extract::Extension, response::IntoResponse};

use claimgate_auth::EvaluationResult;

pub const STAFF_POLICY: &str = "RequireUserAdminManagerRole";
pub const ADMIN_POLICY: &str = "IsAdminClaimAccess";
pub const EMPLOYEE_POLICY: &str = "IsEmployeeClaimAccess";
pub const VETERAN_POLICY: &str = "MinimumAccountAge";
pub const TEST_POLICY: &str = "TestClaim";

fn area(name: &'static str, result: &EvaluationResult) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "area": name,
        "policy": result.policy,
        "principal_id": result.principal_id.to_string(),
    }))
}

pub async fn staff(Extension(result): Extension<EvaluationResult>) -> impl IntoResponse {
    area("staff", &result)
}

pub async fn admin(Extension(result): Extension<EvaluationResult>) -> impl IntoResponse {
    area("admin", &result)
}

pub async fn employee(Extension(result): Extension<EvaluationResult>) -> impl IntoResponse {
    area("employee", &result)
}

pub async fn veteran(Extension(result): Extension<EvaluationResult>) -> impl IntoResponse {
    area("veteran", &result)
}

pub async fn test(Extension(result): Extension<EvaluationResult>) -> impl IntoResponse {
    area("test", &result)
}
