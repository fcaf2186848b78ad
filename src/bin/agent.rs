use calc_cluster::config::AgentConfig;
use calc_cluster::worker::WorkerPool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = AgentConfig::from_env();
    tracing::info!(
        "Agent targeting {} with {} workers",
        config.orchestrator_url,
        config.computing_power
    );

    let pool = WorkerPool::new(config);
    pool.start();

    tokio::signal::ctrl_c().await?;
    tracing::info!("Agent shutting down");

    Ok(())
}
