//! Worker agent: pulls elementary operations from the orchestrator,
//! evaluates them, and pushes results (or errors) back.
//!
//! ## Submodules
//! - **`client`**: HTTP client of the `/internal/task` pull/push pair.
//! - **`compute`**: the arithmetic itself, with division-by-zero and
//!   overflow (±Inf) detection.
//!
//! The pool spawns `computing_power` independent polling loops. Each
//! claimed task sleeps for its `operation_time` to simulate the configured
//! cost of the operation before the result is reported.

pub mod client;
pub mod compute;

#[cfg(test)]
mod tests;

use crate::config::AgentConfig;
use crate::scheduler::protocol::{TaskCompleted, TaskPayload};
use client::OrchestratorClient;

use std::sync::Arc;
use std::time::Duration;

pub struct WorkerPool {
    client: Arc<OrchestratorClient>,
    config: AgentConfig,
}

impl WorkerPool {
    pub fn new(config: AgentConfig) -> Self {
        let client = Arc::new(OrchestratorClient::new(
            &config.orchestrator_url,
            &config.api_key_prefix,
            &config.api_key,
        ));
        Self { client, config }
    }

    /// Spawns the polling workers. Returns immediately; the loops run until
    /// the process exits.
    pub fn start(&self) {
        tracing::info!("Starting {} workers", self.config.computing_power);

        for worker_id in 0..self.config.computing_power {
            let client = self.client.clone();
            let repeat = Duration::from_millis(self.config.repeat_ms);
            let repeat_err = Duration::from_millis(self.config.repeat_err_ms);
            tokio::spawn(async move {
                worker_loop(worker_id, client, repeat, repeat_err).await;
            });
        }
    }
}

async fn worker_loop(
    worker_id: usize,
    client: Arc<OrchestratorClient>,
    repeat: Duration,
    repeat_err: Duration,
) {
    tracing::info!("Worker {} started", worker_id);
    let mut last_error = String::new();

    loop {
        let task = match client.fetch_task().await {
            Ok(Some(task)) => task,
            Ok(None) => {
                tracing::trace!("Worker {}: no task available", worker_id);
                tokio::time::sleep(repeat).await;
                continue;
            }
            Err(e) => {
                // Log each distinct failure once instead of spamming while
                // the orchestrator is unreachable.
                let message = e.to_string();
                if message != last_error {
                    tracing::error!("Worker {}: failed to fetch task: {}", worker_id, message);
                    last_error = message;
                }
                tokio::time::sleep(repeat_err).await;
                continue;
            }
        };
        last_error.clear();

        tracing::debug!("Worker {}: picked up task {}", worker_id, task.id);
        let completed = run_task(&task).await;

        match client.complete_task(&completed).await {
            Ok(()) => tracing::debug!("Worker {}: reported task {}", worker_id, task.id),
            Err(e) => tracing::error!(
                "Worker {}: failed to report task {}: {}",
                worker_id,
                task.id,
                e
            ),
        }
    }
}

/// Evaluates one dispatched task, spending its configured `operation_time`
/// first. Errors become a zero result plus an error message the scheduler
/// uses to fail the whole expression.
async fn run_task(task: &TaskPayload) -> TaskCompleted {
    tokio::time::sleep(Duration::from_millis(task.operation_time)).await;

    let (result, error) = match compute::evaluate(task.operation, task.args) {
        Ok(value) => (value, None),
        Err(e) => (0.0, Some(e.to_string())),
    };

    TaskCompleted {
        expression: task.expression.clone(),
        id: task.id.clone(),
        result,
        error,
    }
}
