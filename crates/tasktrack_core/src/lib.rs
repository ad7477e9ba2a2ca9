//! Core domain logic for the task-tracking service.
//! This crate is the single source of truth for business invariants.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod service;

pub use auth::session::{Claims, SessionError, SessionService};
pub use config::{ConfigError, ServiceConfig};
pub use dashboard::{DashboardStats, PriorityBreakdown};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::employee::{Employee, EmployeeCredentials, EmployeeId, NewEmployee, Role};
pub use model::project::{Project, ProjectId};
pub use model::task::{
    EmployeeTimeLog, NewTask, Task, TaskId, TaskPriority, TaskStatus, TimeLog,
};
pub use model::{EntityKind, ValidationError};
pub use policy::{authorize, Caller, Decision, DenyReason, Operation};
pub use repo::{RepoError, RepoResult};
pub use service::dashboard_service::DashboardService;
pub use service::identity_service::{
    open_session, resolve_session, HashedRegistration, IdentityService, LoginSession,
};
pub use service::project_service::ProjectService;
pub use service::task_service::TaskService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
