//! Environment-driven configuration.
//!
//! Every knob is read once at startup and handed to the component that needs
//! it (the compiler gets `OpTimes`, the router gets the auth settings, the
//! agent gets its poll intervals). Nothing here is a process-wide global.

use crate::scheduler::types::Operation;

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_string(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Configured per-operation latency in milliseconds.
///
/// The values are informational for the scheduler (they ride along on the
/// dispatched task) and bound the worker's simulated computation time.
#[derive(Debug, Clone, Default)]
pub struct OpTimes {
    pub addition_ms: u64,
    pub subtraction_ms: u64,
    pub multiplication_ms: u64,
    pub division_ms: u64,
    pub power_ms: u64,
    pub unary_minus_ms: u64,
}

impl OpTimes {
    pub fn from_env() -> Self {
        Self {
            addition_ms: env_u64("TIME_ADDITION_MS", 0),
            subtraction_ms: env_u64("TIME_SUBTRACTION_MS", 0),
            multiplication_ms: env_u64("TIME_MULTIPLICATION_MS", 0),
            division_ms: env_u64("TIME_DIVISION_MS", 0),
            power_ms: env_u64("TIME_POWER_MS", 0),
            unary_minus_ms: env_u64("TIME_UNARY_MINUS_MS", 0),
        }
    }

    pub fn for_op(&self, op: Operation) -> u64 {
        match op {
            Operation::Add => self.addition_ms,
            Operation::Subtract => self.subtraction_ms,
            Operation::Multiply => self.multiplication_ms,
            Operation::Divide => self.division_ms,
            Operation::Power => self.power_ms,
            Operation::UnaryMinus => self.unary_minus_ms,
        }
    }
}

/// Orchestrator process settings.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub addr: String,
    pub port: u16,
    pub op_times: OpTimes,
    /// Slack added on top of `op_time_ms` before a dispatched task is
    /// considered abandoned and becomes dispatchable again.
    pub lease_slack_ms: u64,
    /// Worker shared secret; empty disables auth on `/internal`.
    pub api_key: String,
    pub api_key_prefix: String,
}

impl OrchestratorConfig {
    pub fn from_env() -> Self {
        Self {
            addr: env_string("ADDR_ORCHESTRATOR", "127.0.0.1"),
            port: std::env::var("PORT_ORCHESTRATOR")
                .ok()
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(8080),
            op_times: OpTimes::from_env(),
            lease_slack_ms: env_u64("TASK_LEASE_SLACK_MS", 5000),
            api_key: std::env::var("AUTH_API_KEY").unwrap_or_default(),
            api_key_prefix: env_string("AUTH_API_KEY_PREFIX", "Bearer "),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

/// Worker agent settings.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub orchestrator_url: String,
    /// Number of concurrent polling workers.
    pub computing_power: usize,
    /// Idle re-poll interval (ms) when no task is available.
    pub repeat_ms: u64,
    /// Backoff interval (ms) after a transport error.
    pub repeat_err_ms: u64,
    pub api_key: String,
    pub api_key_prefix: String,
}

impl AgentConfig {
    pub fn from_env() -> Self {
        let addr = env_string("ADDR_ORCHESTRATOR", "127.0.0.1");
        let port = env_u64("PORT_ORCHESTRATOR", 8080);
        Self {
            orchestrator_url: format!("http://{}:{}", addr, port),
            computing_power: env_u64("COMPUTING_POWER", 4) as usize,
            repeat_ms: env_u64("AGENT_REPEAT", 5000),
            repeat_err_ms: env_u64("AGENT_REPEAT_ERR", 2000),
            api_key: std::env::var("AUTH_API_KEY").unwrap_or_default(),
            api_key_prefix: env_string("AUTH_API_KEY_PREFIX", "Bearer "),
        }
    }
}
