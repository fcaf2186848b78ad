use super::types::{
    now_ms, DispatchedTask, Expression, ExpressionId, Operand, Status, Task, TaskId, TaskKind,
};
use crate::compiler::{self, CompileError};
use crate::config::OpTimes;

use std::collections::HashMap;
use tokio::sync::RwLock;

const DEFAULT_LEASE_SLACK_MS: u64 = 5000;

/// In-memory store of expressions and their tasks, plus the dispatch and
/// completion logic workers drive over HTTP.
///
/// One reader-writer lock guards the whole map. Reads (listing, task
/// inspection) take the read side. Everything that transitions state
/// (insertion, dispatch, completion, evict-on-read) takes the write side,
/// so all transitions are totally ordered.
pub struct TaskManager {
    expressions: RwLock<HashMap<ExpressionId, Expression>>,
    op_times: OpTimes,
    lease_slack_ms: u64,
}

impl TaskManager {
    pub fn new(op_times: OpTimes) -> Self {
        Self::with_lease_slack(op_times, DEFAULT_LEASE_SLACK_MS)
    }

    /// `lease_slack_ms` is the grace period added to a task's `op_time_ms`
    /// before an unacknowledged dispatch is handed out again.
    pub fn with_lease_slack(op_times: OpTimes, lease_slack_ms: u64) -> Self {
        Self {
            expressions: RwLock::new(HashMap::new()),
            op_times,
            lease_slack_ms,
        }
    }

    /// Compiles `source` and stores it as a new pending expression,
    /// returning its id. Compile errors propagate unchanged.
    pub async fn add_expression(&self, source: &str) -> Result<ExpressionId, CompileError> {
        let id = ExpressionId::new();
        let tasks = compiler::compile(&id, source, &self.op_times)?;

        let expression = Expression {
            id: id.clone(),
            source: source.to_string(),
            status: Status::Pending,
            tasks,
            result: None,
            error: None,
        };

        let mut expressions = self.expressions.write().await;
        expressions.insert(id.clone(), expression);
        tracing::debug!("Added expression {}", id.0);

        Ok(id)
    }

    /// Snapshot of every stored expression. Never evicts.
    pub async fn list_expressions(&self) -> Vec<Expression> {
        let expressions = self.expressions.read().await;
        expressions.values().cloned().collect()
    }

    /// Snapshot of the expression with `id`, or `None` if unknown.
    ///
    /// Retrieving a `completed` expression removes it from the store: the
    /// final value is delivered exactly once, then forgotten.
    pub async fn get_expression(&self, id: &ExpressionId) -> Option<Expression> {
        let mut expressions = self.expressions.write().await;
        let expression = expressions.get(id)?;
        if expression.status == Status::Completed {
            tracing::debug!("Expression {} delivered and evicted", id.0);
            return expressions.remove(id);
        }
        Some(expression.clone())
    }

    /// Tasks of expression `id`, or empty if unknown. Debug use.
    pub async fn tasks_for(&self, id: &ExpressionId) -> Vec<Task> {
        let expressions = self.expressions.read().await;
        expressions
            .get(id)
            .map(|expression| expression.tasks.clone())
            .unwrap_or_default()
    }

    /// Picks the first runnable task, flips it to `processing` and returns
    /// it with every argument slot resolved to a concrete number.
    ///
    /// A task is runnable when it is `pending` and each dependency is
    /// `completed`. Tasks stuck in `processing` past their lease revert to
    /// `pending` first, so work dispatched to a vanished worker is retried.
    pub async fn next_task(&self) -> Option<DispatchedTask> {
        let mut expressions = self.expressions.write().await;
        let now = now_ms();

        for expression in expressions.values_mut() {
            if !matches!(expression.status, Status::Pending | Status::Processing) {
                continue;
            }

            reclaim_expired(expression, now);

            let Some(index) = expression
                .tasks
                .iter()
                .position(|task| task.status == Status::Pending && runnable(&expression.tasks, task))
            else {
                continue;
            };

            let args = resolve_args(&expression.tasks, index);
            let task = &mut expression.tasks[index];
            task.status = Status::Processing;
            task.lease_expires = Some(now + task.op_time_ms + self.lease_slack_ms);

            let dispatched = DispatchedTask {
                id: task.id.clone(),
                expr_id: expression.id.clone(),
                op: task.kind.operation(),
                args,
                op_time_ms: task.op_time_ms,
            };

            if expression.status == Status::Pending {
                expression.status = Status::Processing;
            }

            tracing::debug!(
                "Dispatched task {} of expression {}",
                dispatched.id.0,
                dispatched.expr_id.0
            );
            return Some(dispatched);
        }

        None
    }

    /// Records a worker's report for a task.
    ///
    /// A non-empty `error` fails the whole expression; individual tasks are
    /// left alone and any late completions for the same expression are
    /// accepted as no-ops. Otherwise the task's result is stored and, once
    /// every task has completed, the expression completes with the root
    /// task's result. Returns `false` when the expression or task is
    /// unknown.
    pub async fn complete_task(
        &self,
        expr_id: &ExpressionId,
        task_id: &TaskId,
        error: Option<&str>,
        result: f64,
    ) -> bool {
        let mut expressions = self.expressions.write().await;
        let Some(expression) = expressions.get_mut(expr_id) else {
            return false;
        };

        if let Some(text) = error.filter(|text| !text.is_empty()) {
            if expression.status != Status::Error {
                expression.status = Status::Error;
                expression.error = Some(text.to_string());
                tracing::debug!("Expression {} failed: {}", expr_id.0, text);
            }
            return true;
        }

        if expression.status == Status::Error {
            // Terminally failed; accept in-flight completions as no-ops.
            return true;
        }

        let Some(task) = expression
            .tasks
            .iter_mut()
            .find(|task| task.id == *task_id)
        else {
            return false;
        };

        task.result = Some(result);
        task.status = Status::Completed;
        task.lease_expires = None;
        tracing::debug!(
            "Task {} of expression {} completed with result {}",
            task_id.0,
            expr_id.0,
            result
        );

        if expression
            .tasks
            .iter()
            .all(|task| task.status == Status::Completed)
        {
            expression.status = Status::Completed;
            // Tasks are in creation order; the last one is the root.
            expression.result = expression.tasks.last().and_then(|task| task.result);
            tracing::debug!(
                "Expression {} completed with result {:?}",
                expr_id.0,
                expression.result
            );
        }

        true
    }
}

fn reclaim_expired(expression: &mut Expression, now: u64) {
    for task in expression.tasks.iter_mut() {
        if task.status == Status::Processing
            && task.lease_expires.is_some_and(|expires| expires < now)
        {
            tracing::warn!(
                "Task {} of expression {} lease expired, requeueing",
                task.id.0,
                expression.id.0
            );
            task.status = Status::Pending;
            task.lease_expires = None;
        }
    }
}

/// Every dependency of `task` is `completed` within the same expression.
fn runnable(tasks: &[Task], task: &Task) -> bool {
    task.kind.dependencies().all(|dep| {
        tasks
            .iter()
            .any(|other| other.id == *dep && other.status == Status::Completed)
    })
}

/// Concrete argument values for the task at `index`, reading dependency
/// results from their (completed) producer tasks. Slot 1 stays `None` for
/// unary minus.
fn resolve_args(tasks: &[Task], index: usize) -> [Option<f64>; 2] {
    let lookup = |operand: &Operand| match operand {
        Operand::Literal(value) => Some(*value),
        Operand::TaskResult(id) => tasks
            .iter()
            .find(|task| task.id == *id)
            .and_then(|task| task.result),
    };

    match &tasks[index].kind {
        TaskKind::Binary { args, .. } => [lookup(&args[0]), lookup(&args[1])],
        TaskKind::Negate { arg } => [lookup(arg), None],
    }
}
