use super::types::{DispatchedTask, Expression, Operand, Operation, Status, Task, TaskKind};
use serde::{Deserialize, Serialize};

// Endpoints
pub const ENDPOINT_CALCULATE: &str = "/api/v1/calculate";
pub const ENDPOINT_EXPRESSIONS: &str = "/api/v1/expressions";
pub const ENDPOINT_TASK: &str = "/internal/task";

// Expression submission (public API)
#[derive(Debug, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub expression: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// Expression status (public API)
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpressionSummary {
    pub id: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Expression> for ExpressionSummary {
    fn from(expression: &Expression) -> Self {
        Self {
            id: expression.id.0.clone(),
            status: expression.status,
            result: expression.result,
            error: expression.error.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExpressionsResponse {
    pub expressions: Vec<ExpressionSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExpressionResponse {
    pub expression: ExpressionSummary,
}

// Task dispatch (internal, worker-facing)
//
// `args` keeps the null-slot convention of the wire format: a `null` slot is
// semantically unset, which in a dispatched task only happens for slot 1 of
// unary minus.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskPayload {
    pub id: String,
    pub args: [Option<f64>; 2],
    pub operation: Operation,
    pub operation_time: u64,
    pub expression: String,
}

impl From<DispatchedTask> for TaskPayload {
    fn from(task: DispatchedTask) -> Self {
        Self {
            id: task.id.0,
            args: task.args,
            operation: task.op,
            operation_time: task.op_time_ms,
            expression: task.expr_id.0,
        }
    }
}

// Task completion (internal, worker-facing)
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskCompleted {
    pub expression: String,
    pub id: String,
    pub result: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// Debug task listing (internal)
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub args: [Option<f64>; 2],
    pub operation: Operation,
    pub operation_time: u64,
    /// Producer task id per slot; empty string when the slot is a literal.
    pub dependencies: [String; 2],
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
    pub expression: String,
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        let slot = |operand: &Operand| match operand {
            Operand::Literal(value) => (Some(*value), String::new()),
            Operand::TaskResult(id) => (None, id.0.clone()),
        };

        let (args, dependencies) = match &task.kind {
            TaskKind::Binary { args, .. } => {
                let (a, dep_a) = slot(&args[0]);
                let (b, dep_b) = slot(&args[1]);
                ([a, b], [dep_a, dep_b])
            }
            TaskKind::Negate { arg } => {
                let (a, dep_a) = slot(arg);
                ([a, None], [dep_a, String::new()])
            }
        };

        Self {
            id: task.id.0.clone(),
            args,
            operation: task.kind.operation(),
            operation_time: task.op_time_ms,
            dependencies,
            status: task.status,
            result: task.result,
            expression: task.expr_id.0.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TasksResponse {
    pub tasks: Vec<TaskRecord>,
}
