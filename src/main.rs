use calc_cluster::auth::AuthConfig;
use calc_cluster::config::OrchestratorConfig;
use calc_cluster::scheduler::handlers::api_router;
use calc_cluster::scheduler::manager::TaskManager;

use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = OrchestratorConfig::from_env();

    let manager = Arc::new(TaskManager::with_lease_slack(
        config.op_times.clone(),
        config.lease_slack_ms,
    ));
    let auth = Arc::new(AuthConfig::new(
        config.api_key_prefix.clone(),
        config.api_key.clone(),
    ));

    let app = api_router(manager, auth);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Orchestrator listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
