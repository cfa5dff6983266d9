use std::sync::Arc;

use anyhow::Context;

use claimgate_api::app::{build_app, services};
use claimgate_api::config::ApiConfig;
use claimgate_core::{Clock, SystemClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    claimgate_observability::init();

    let config = ApiConfig::from_env()?;
    let registry = services::load_registry(&config)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let (app_services, authenticator) = services::build_dev_services(&config, registry, clock)?;

    let app = build_app(app_services, authenticator);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
