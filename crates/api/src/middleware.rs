use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::app::errors;
use crate::authn::{AuthnError, Authenticator};

#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<dyn Authenticator>,
}

/// Resolve the caller and attach its [`claimgate_auth::Principal`] to the request.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(token) => token,
        Err(status) => {
            return errors::json_error(status, "unauthenticated", "missing or malformed bearer token");
        }
    };

    let principal = match state.authenticator.authenticate(token) {
        Ok(principal) => principal,
        Err(AuthnError::UnknownToken) => {
            return errors::json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "unknown token");
        }
        Err(AuthnError::Store(e)) => {
            tracing::error!(error = %e, "claim store failed while authenticating");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "claim_store_error",
                "could not load principal",
            );
        }
    };

    req.extensions_mut().insert(principal);
    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
