use crate::scheduler::protocol::{TaskCompleted, TaskPayload, ENDPOINT_TASK};

use anyhow::Result;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_millis(1500);
const COMPLETE_ATTEMPTS: usize = 3;

/// HTTP client of the orchestrator's internal endpoints.
pub struct OrchestratorClient {
    base_url: String,
    http_client: reqwest::Client,
    /// Full `Authorization` header value, prebuilt from prefix + key.
    auth_header: Option<String>,
}

impl OrchestratorClient {
    pub fn new(base_url: &str, api_key_prefix: &str, api_key: &str) -> Self {
        let auth_header = if api_key.is_empty() {
            None
        } else {
            Some(format!("{}{}", api_key_prefix, api_key))
        };

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
            auth_header,
        }
    }

    fn task_url(&self) -> String {
        format!("{}{}", self.base_url, ENDPOINT_TASK)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_header {
            Some(header) => request.header(reqwest::header::AUTHORIZATION, header),
            None => request,
        }
    }

    /// Asks for one runnable task. `None` when the orchestrator has nothing
    /// to hand out (404).
    pub async fn fetch_task(&self) -> Result<Option<TaskPayload>> {
        let request = self
            .http_client
            .get(self.task_url())
            .timeout(REQUEST_TIMEOUT);
        let response = self.authorize(request).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "task fetch failed: {}",
                response.status()
            ));
        }

        Ok(Some(response.json().await?))
    }

    /// Reports a finished (or failed) task, retrying transport errors with
    /// backoff so a transient orchestrator hiccup does not lose the result.
    pub async fn complete_task(&self, completed: &TaskCompleted) -> Result<()> {
        let mut delay_ms = 150u64;

        for attempt in 0..COMPLETE_ATTEMPTS {
            let request = self
                .http_client
                .post(self.task_url())
                .json(completed)
                .timeout(REQUEST_TIMEOUT);

            match self.authorize(request).send().await {
                Ok(response) if response.status().is_success() => return Ok(()),
                Ok(response) => {
                    return Err(anyhow::anyhow!(
                        "task completion rejected: {}",
                        response.status()
                    ));
                }
                Err(e) => {
                    if attempt + 1 == COMPLETE_ATTEMPTS {
                        return Err(anyhow::anyhow!(e));
                    }
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                }
            }
        }

        Err(anyhow::anyhow!("retry attempts exhausted"))
    }
}
