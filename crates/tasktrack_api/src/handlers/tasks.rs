use super::Message;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;
use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tasktrack_core::{
    Caller, EmployeeId, NewTask, ProjectId, Task, TaskId, TaskPriority, TaskService, TaskStatus,
    TimeLog,
};

/// Task record plus its derived hour total.
#[derive(Debug, Serialize)]
pub(crate) struct TaskView {
    #[serde(flatten)]
    task: Task,
    total_hours: f64,
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        let total_hours = task.total_hours();
        Self { task, total_hours }
    }
}

fn views(tasks: Vec<Task>) -> Json<Vec<TaskView>> {
    Json(tasks.into_iter().map(TaskView::from).collect())
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateTaskRequest {
    title: String,
    description: String,
    assigned_to: EmployeeId,
    #[serde(default)]
    priority: TaskPriority,
    #[serde(default)]
    project_id: Option<ProjectId>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(body: CreateTaskRequest) -> Self {
        Self {
            title: body.title,
            description: body.description,
            assigned_to: body.assigned_to,
            priority: body.priority,
            project_id: body.project_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateTaskResponse {
    message: &'static str,
    task_id: TaskId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusRequest {
    status: TaskStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimeLogRequest {
    hours: f64,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectLinkRequest {
    #[serde(default)]
    project_id: Option<ProjectId>,
}

pub(crate) async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiJson(body): ApiJson<CreateTaskRequest>,
) -> ApiResult<Json<CreateTaskResponse>> {
    let task_id = state
        .with_conn(move |conn| Ok(TaskService::open(conn)?.create_task(&caller, body.into())?))
        .await?;
    Ok(Json(CreateTaskResponse {
        message: "Task created successfully",
        task_id,
    }))
}

pub(crate) async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<Vec<TaskView>>> {
    let tasks = state
        .with_conn(move |conn| Ok(TaskService::open(conn)?.list_tasks(&caller)?))
        .await?;
    Ok(views(tasks))
}

pub(crate) async fn get_one(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(task_id): ApiPath<TaskId>,
) -> ApiResult<Json<TaskView>> {
    let task = state
        .with_conn(move |conn| Ok(TaskService::open(conn)?.get_task(&caller, task_id)?))
        .await?;
    Ok(Json(task.into()))
}

pub(crate) async fn update_status(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(task_id): ApiPath<TaskId>,
    ApiJson(body): ApiJson<StatusRequest>,
) -> ApiResult<Json<Message>> {
    state
        .with_conn(move |conn| {
            Ok(TaskService::open(conn)?.update_status(&caller, task_id, body.status)?)
        })
        .await?;
    Ok(Message::json("Task status updated successfully"))
}

pub(crate) async fn log_time(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(task_id): ApiPath<TaskId>,
    ApiJson(body): ApiJson<TimeLogRequest>,
) -> ApiResult<Json<Message>> {
    state
        .with_conn(move |conn| {
            Ok(TaskService::open(conn)?.log_time(&caller, task_id, body.hours, body.description)?)
        })
        .await?;
    Ok(Message::json("Time log added successfully"))
}

pub(crate) async fn time_logs(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(task_id): ApiPath<TaskId>,
) -> ApiResult<Json<Vec<TimeLog>>> {
    let logs = state
        .with_conn(move |conn| Ok(TaskService::open(conn)?.task_time_logs(&caller, task_id)?))
        .await?;
    Ok(Json(logs))
}

pub(crate) async fn reassign_project(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(task_id): ApiPath<TaskId>,
    ApiJson(body): ApiJson<ProjectLinkRequest>,
) -> ApiResult<Json<Message>> {
    state
        .with_conn(move |conn| {
            Ok(TaskService::open(conn)?.reassign_project(&caller, task_id, body.project_id)?)
        })
        .await?;
    Ok(Message::json("Task project updated successfully"))
}

pub(crate) async fn without_project(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<Vec<TaskView>>> {
    let tasks = state
        .with_conn(move |conn| Ok(TaskService::open(conn)?.tasks_without_project(&caller)?))
        .await?;
    Ok(views(tasks))
}
