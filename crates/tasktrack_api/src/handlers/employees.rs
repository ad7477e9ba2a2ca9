use crate::error::ApiResult;
use crate::extract::ApiPath;
use crate::state::AppState;
use axum::extract::State;
use axum::{Extension, Json};
use tasktrack_core::{Caller, Employee, EmployeeId, EmployeeTimeLog, IdentityService, TaskService};

pub(crate) async fn me(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<Employee>> {
    let sessions = state.sessions().clone();
    let employee = state
        .with_conn(move |conn| {
            Ok(IdentityService::open(conn, sessions)?.current_employee(&caller)?)
        })
        .await?;
    Ok(Json(employee))
}

pub(crate) async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<Vec<Employee>>> {
    let sessions = state.sessions().clone();
    let employees = state
        .with_conn(move |conn| Ok(IdentityService::open(conn, sessions)?.list_employees(&caller)?))
        .await?;
    Ok(Json(employees))
}

pub(crate) async fn get_one(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(employee_id): ApiPath<EmployeeId>,
) -> ApiResult<Json<Employee>> {
    let sessions = state.sessions().clone();
    let employee = state
        .with_conn(move |conn| {
            Ok(IdentityService::open(conn, sessions)?.get_employee(&caller, employee_id)?)
        })
        .await?;
    Ok(Json(employee))
}

pub(crate) async fn time_logs(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(employee_id): ApiPath<EmployeeId>,
) -> ApiResult<Json<Vec<EmployeeTimeLog>>> {
    let logs = state
        .with_conn(move |conn| {
            Ok(TaskService::open(conn)?.employee_time_logs(&caller, employee_id)?)
        })
        .await?;
    Ok(Json(logs))
}
