//! HTTP surface of the orchestrator.
//!
//! Public endpoints accept expressions and report their status; internal
//! endpoints are the pull/push pair workers drive (guarded by the shared
//! secret when one is configured). Bodies are read as raw bytes so the
//! handlers control the split between "empty body" (400) and "malformed
//! JSON" (422).

use super::manager::TaskManager;
use super::protocol::*;
use super::types::{ExpressionId, TaskId};
use crate::auth::{require_worker_auth, AuthConfig};

use axum::body::Bytes;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Assembles the full route tree: public API, internal worker endpoints
/// behind the auth middleware, permissive CORS, shared task manager.
pub fn api_router(manager: Arc<TaskManager>, auth: Arc<AuthConfig>) -> Router {
    let internal = Router::new()
        .route("/task", get(handle_next_task).post(handle_complete_task))
        .route("/task/:id", get(handle_expression_tasks))
        .layer(middleware::from_fn_with_state(auth, require_worker_auth));

    Router::new()
        .route(ENDPOINT_CALCULATE, post(handle_calculate))
        .route(ENDPOINT_EXPRESSIONS, get(handle_list_expressions))
        .route(
            &format!("{}/:id", ENDPOINT_EXPRESSIONS),
            get(handle_get_expression),
        )
        .nest("/internal", internal)
        .layer(CorsLayer::permissive())
        .layer(Extension(manager))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// `POST /api/v1/calculate`: compile and store an expression.
///
/// 201 with the new id on success; 400 for an empty body or blank
/// expression; 422 for undecodable JSON or a compile error.
pub async fn handle_calculate(
    Extension(manager): Extension<Arc<TaskManager>>,
    body: Bytes,
) -> Response {
    if body.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "empty request body");
    }

    let request: CalculateRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(_) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, "failed to decode JSON"),
    };

    let expression = request.expression.trim();
    if expression.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "expression is required");
    }

    match manager.add_expression(expression).await {
        Ok(id) => {
            tracing::debug!("Expression {} created", id.0);
            (StatusCode::CREATED, Json(CalculateResponse { id: id.0 })).into_response()
        }
        Err(err) => error_response(StatusCode::UNPROCESSABLE_ENTITY, &err.to_string()),
    }
}

/// `GET /api/v1/expressions`: status of everything currently stored.
pub async fn handle_list_expressions(
    Extension(manager): Extension<Arc<TaskManager>>,
) -> Json<ExpressionsResponse> {
    let expressions = manager
        .list_expressions()
        .await
        .iter()
        .map(ExpressionSummary::from)
        .collect();

    Json(ExpressionsResponse { expressions })
}

/// `GET /api/v1/expressions/{id}`: status of one expression.
///
/// Reading a completed expression delivers its result and removes it, so a
/// repeat read of the same id is a 404.
pub async fn handle_get_expression(
    Extension(manager): Extension<Arc<TaskManager>>,
    Path(id): Path<String>,
) -> Response {
    match manager.get_expression(&ExpressionId(id)).await {
        Some(expression) => (
            StatusCode::OK,
            Json(ExpressionResponse {
                expression: ExpressionSummary::from(&expression),
            }),
        )
            .into_response(),
        None => error_response(StatusCode::NOT_FOUND, "expression not found"),
    }
}

/// `GET /internal/task`: hand out one runnable task.
///
/// 404 with an empty body when nothing is runnable; workers poll again
/// after their configured delay.
pub async fn handle_next_task(Extension(manager): Extension<Arc<TaskManager>>) -> Response {
    match manager.next_task().await {
        Some(task) => {
            tracing::debug!("Task {} sent to worker", task.id.0);
            (StatusCode::OK, Json(TaskPayload::from(task))).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// `POST /internal/task`: accept a worker's result or error for a task.
pub async fn handle_complete_task(
    Extension(manager): Extension<Arc<TaskManager>>,
    body: Bytes,
) -> Response {
    if body.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "empty request body");
    }

    let completed: TaskCompleted = match serde_json::from_slice(&body) {
        Ok(completed) => completed,
        Err(_) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, "failed to decode JSON"),
    };

    let accepted = manager
        .complete_task(
            &ExpressionId(completed.expression),
            &TaskId(completed.id),
            completed.error.as_deref(),
            completed.result,
        )
        .await;

    if !accepted {
        return error_response(StatusCode::NOT_FOUND, "task not found");
    }

    StatusCode::OK.into_response()
}

/// `GET /internal/task/{id}`: full task records of one expression. Debug
/// endpoint.
pub async fn handle_expression_tasks(
    Extension(manager): Extension<Arc<TaskManager>>,
    Path(id): Path<String>,
) -> Response {
    let tasks = manager.tasks_for(&ExpressionId(id)).await;
    if tasks.is_empty() {
        return error_response(StatusCode::NOT_FOUND, "expression not found");
    }

    let tasks = tasks.iter().map(TaskRecord::from).collect();
    (StatusCode::OK, Json(TasksResponse { tasks })).into_response()
}
