//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: registry/store/authenticator wiring
//! - `routes/`: HTTP routes + handlers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::authn::Authenticator;
use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: AppServices, authenticator: Arc<dyn Authenticator>) -> Router {
    let auth_state = middleware::AuthState { authenticator };

    // Protected routes: require an authenticated principal.
    let protected = routes::router(&services).layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::auth_middleware,
            ))
            .layer(Extension(Arc::new(services))),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}
