use super::tasks::TaskView;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;
use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tasktrack_core::{Caller, Project, ProjectId, ProjectService};

#[derive(Debug, Deserialize)]
pub(crate) struct CreateProjectRequest {
    name: String,
    description: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateProjectResponse {
    message: &'static str,
    project_id: ProjectId,
}

pub(crate) async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiJson(body): ApiJson<CreateProjectRequest>,
) -> ApiResult<Json<CreateProjectResponse>> {
    let project_id = state
        .with_conn(move |conn| {
            Ok(ProjectService::open(conn)?.create_project(&caller, body.name, body.description)?)
        })
        .await?;
    Ok(Json(CreateProjectResponse {
        message: "Project created successfully",
        project_id,
    }))
}

pub(crate) async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    let projects = state
        .with_conn(|conn| Ok(ProjectService::open(conn)?.list_projects()?))
        .await?;
    Ok(Json(projects))
}

pub(crate) async fn get_one(
    State(state): State<AppState>,
    ApiPath(project_id): ApiPath<ProjectId>,
) -> ApiResult<Json<Project>> {
    let project = state
        .with_conn(move |conn| Ok(ProjectService::open(conn)?.get_project(project_id)?))
        .await?;
    Ok(Json(project))
}

pub(crate) async fn tasks(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(project_id): ApiPath<ProjectId>,
) -> ApiResult<Json<Vec<TaskView>>> {
    let tasks = state
        .with_conn(move |conn| Ok(ProjectService::open(conn)?.project_tasks(&caller, project_id)?))
        .await?;
    Ok(Json(tasks.into_iter().map(TaskView::from).collect()))
}
