use std::sync::Arc;

use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::Value;

use claimgate_api::app::{build_app, services};
use claimgate_api::config::{ApiConfig, default_dev_tokens};
use claimgate_auth::{PolicyConfig, PolicyRegistry};
use claimgate_core::{Clock, FixedClock};

const ADMIN: &str = "dev-admin-token";
const EMPLOYEE: &str = "dev-employee-token";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let registry = PolicyConfig::default_policies().into_registry().unwrap();
        Self::spawn_with(registry).await
    }

    async fn spawn_with(registry: PolicyRegistry) -> Self {
        let config = ApiConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            policy_file: None,
            strict_policies: false,
            dev_tokens: default_dev_tokens(),
        };
        let clock: Arc<dyn Clock> =
            Arc::new(FixedClock::at(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()));
        let (app_services, authenticator) =
            services::build_dev_services(&config, registry, clock).unwrap();

        // Same router as prod, bound to an ephemeral port.
        let app = build_app(app_services, authenticator);
        let listener = tokio::net::TcpListener::bind(config.bind_addr)
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut req = self.client.get(format!("{}{}", self.base_url, path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await.unwrap();
        let status = res.status();
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_public() {
    let server = TestServer::spawn().await;
    let (status, _) = server.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_known_bearer_token() {
    let server = TestServer::spawn().await;

    let (status, body) = server.get("/whoami", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthenticated");

    let (status, _) = server.get("/areas/staff", Some("forged")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn whoami_lists_seeded_claims() {
    let server = TestServer::spawn().await;
    let (status, body) = server.get("/whoami", Some(ADMIN)).await;
    assert_eq!(status, StatusCode::OK);

    let claims = body["claims"].as_array().unwrap();
    assert!(claims
        .iter()
        .any(|c| c["name"] == "IsAdmin" && c["value"] == "true"));
}

#[tokio::test]
async fn admin_area_is_gated_by_is_admin_claim() {
    let server = TestServer::spawn().await;

    let (status, body) = server.get("/areas/admin", Some(ADMIN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["policy"], "IsAdminClaimAccess");

    let (status, body) = server.get("/areas/admin", Some(EMPLOYEE)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "access_denied");
}

#[tokio::test]
async fn employee_area_and_staff_area() {
    let server = TestServer::spawn().await;

    let (status, _) = server.get("/areas/employee", Some(EMPLOYEE)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.get("/areas/employee", Some(ADMIN)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin holds role Admin, employee holds role User: both are staff.
    let (status, _) = server.get("/areas/staff", Some(ADMIN)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.get("/areas/staff", Some(EMPLOYEE)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn veteran_area_uses_account_age() {
    let server = TestServer::spawn().await;

    // Seeded admin registered 30 days before the pinned clock; employee at it.
    let (status, _) = server.get("/areas/veteran", Some(ADMIN)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.get("/areas/veteran", Some(EMPLOYEE)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_policy_is_a_server_fault_not_a_denial() {
    let mut config = PolicyConfig::default_policies();
    config.policies.retain(|p| p.name != "TestClaim");
    let server = TestServer::spawn_with(config.into_registry().unwrap()).await;

    let (status, body) = server.get("/areas/test", Some(ADMIN)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "policy_misconfigured");

    // Configured policies keep working.
    let (status, _) = server.get("/areas/admin", Some(ADMIN)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn explain_reports_every_requirement() {
    let server = TestServer::spawn().await;

    let (status, body) = server.get("/authz/explain/MinimumAccountAge", Some(EMPLOYEE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["succeeded"], false);
    assert_eq!(body["outcomes"][0]["reason"]["kind"], "account_too_new");

    let (status, body) = server.get("/authz/explain/NoSuchPolicy", Some(EMPLOYEE)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "policy_not_found");
}

#[tokio::test]
async fn policy_listing_flags_shadowed_names() {
    let server = TestServer::spawn().await;
    let (status, body) = server.get("/authz/policies", Some(ADMIN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shadowed"], serde_json::json!(["IsAdminClaimAccess"]));
    assert_eq!(body["policies"].as_array().unwrap().len(), 5);
}
