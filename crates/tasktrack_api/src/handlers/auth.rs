use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::{run_blocking, AppState};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tasktrack_core::{
    open_session, EmployeeId, HashedRegistration, IdentityService, NewEmployee, Role,
};

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    name: String,
    email: String,
    password: String,
    /// Any value other than "Manager" registers a plain employee.
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterResponse {
    message: &'static str,
    employee_id: EmployeeId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginResponse {
    employee_id: EmployeeId,
    name: String,
    email: String,
    role: Role,
    token: String,
}

fn registration_role(value: Option<&str>) -> Role {
    match value {
        Some("Manager") => Role::Manager,
        _ => Role::Employee,
    }
}

/// Hashes on the blocking pool first, then takes the store only for the
/// insert.
pub(crate) async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    let request = NewEmployee {
        role: registration_role(body.role.as_deref()),
        name: body.name,
        email: body.email,
        password: body.password,
    };
    let registration = run_blocking(move || Ok(HashedRegistration::hash(request)?)).await?;

    let sessions = state.sessions().clone();
    let employee_id = state
        .with_conn(move |conn| {
            Ok(IdentityService::open(conn, sessions)?.register_hashed(registration)?)
        })
        .await?;
    Ok(Json(RegisterResponse {
        message: "Employee registered successfully",
        employee_id,
    }))
}

/// Reads credentials under the store lock, verifies the password after
/// releasing it.
pub(crate) async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let LoginRequest { email, password } = body;
    let sessions = state.sessions().clone();
    let credentials = state
        .with_conn(move |conn| Ok(IdentityService::open(conn, sessions)?.credentials_for(&email)?))
        .await?;

    let sessions = state.sessions().clone();
    let session =
        run_blocking(move || Ok(open_session(&sessions, credentials, &password)?)).await?;
    Ok(Json(LoginResponse {
        employee_id: session.employee.id,
        name: session.employee.name,
        email: session.employee.email,
        role: session.employee.role,
        token: session.token,
    }))
}
