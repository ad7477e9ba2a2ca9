//! HTTP surface for the task-tracking service.
//!
//! # Responsibility
//! - Map routes onto `tasktrack_core` services.
//! - Authenticate bearer sessions before any protected handler runs.
//! - Render every failure as `{"detail": "..."}` with a matching status.
//!
//! # Invariants
//! - Handlers never touch the store directly; they go through services.
//! - The shared connection is locked for the whole of one service call.

mod error;
mod extract;
mod handlers;
mod middleware;
mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use axum::Router;
use handlers::{auth, dashboard, employees, projects, tasks};

/// Builds the full router over `state`.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/employees/me", get(employees::me))
        .route("/employees", get(employees::list))
        .route("/employees/:employee_id", get(employees::get_one))
        .route("/employees/:employee_id/time-logs", get(employees::time_logs))
        .route("/tasks", post(tasks::create).get(tasks::list))
        .route("/tasks/without-project", get(tasks::without_project))
        .route("/tasks/:task_id", get(tasks::get_one))
        .route("/tasks/:task_id/status", put(tasks::update_status))
        .route("/tasks/:task_id/time-log", post(tasks::log_time))
        .route("/tasks/:task_id/time-logs", get(tasks::time_logs))
        .route("/tasks/:task_id/project", put(tasks::reassign_project))
        .route("/projects", post(projects::create).get(projects::list))
        .route("/projects/:project_id", get(projects::get_one))
        .route("/projects/:project_id/tasks", get(projects::tasks))
        .route("/dashboard/stats", get(dashboard::stats))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_session));

    Router::new()
        .route("/", get(handlers::root))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected)
        .with_state(state)
}
