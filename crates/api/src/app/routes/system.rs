use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use claimgate_auth::Principal;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(serde_json::json!({
        "principal_id": principal.id().to_string(),
        "claims": principal.claims(),
    }))
}
