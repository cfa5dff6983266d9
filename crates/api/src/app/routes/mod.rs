use axum::{Router, routing::get};

use crate::app::AppServices;
use crate::authz::{self, PolicyGate};

pub mod areas;
pub mod policies;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router(services: &AppServices) -> Router {
    let gate = |policy: &'static str| {
        axum::middleware::from_fn_with_state(
            PolicyGate::new(services.evaluator.clone(), services.clock.clone(), policy),
            authz::policy_gate,
        )
    };

    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/areas/staff", get(areas::staff).layer(gate(areas::STAFF_POLICY)))
        .route("/areas/admin", get(areas::admin).layer(gate(areas::ADMIN_POLICY)))
        .route("/areas/employee", get(areas::employee).layer(gate(areas::EMPLOYEE_POLICY)))
        .route("/areas/veteran", get(areas::veteran).layer(gate(areas::VETERAN_POLICY)))
        .route("/areas/test", get(areas::test).layer(gate(areas::TEST_POLICY)))
        .nest("/authz", policies::router())
}
