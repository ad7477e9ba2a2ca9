//! Identity and session use-cases.
//!
//! # Responsibility
//! - Register employees with hashed credentials.
//! - Authenticate by email/password and issue session tokens.
//! - Resolve session tokens to callers.
//! - Serve public employee views behind the access policy.
//!
//! # Invariants
//! - Login failures never reveal whether the email exists.
//! - Only public `Employee` views leave this service.

use super::{ensure_allowed, not_found, ServiceError, ServiceResult};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::SessionService;
use crate::model::employee::{Employee, EmployeeCredentials, EmployeeId, NewEmployee, Role};
use crate::model::{EntityKind, ValidationError};
use crate::policy::{Caller, Operation};
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::RepoResult;
use log::{debug, info, warn};
use rusqlite::Connection;

/// Registration input with the password already hashed.
///
/// Hashing is slow; building this before touching the store keeps the store
/// free while the hash is computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedRegistration {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
}

impl HashedRegistration {
    /// Rejects an empty password, then hashes it.
    pub fn hash(request: NewEmployee) -> ServiceResult<Self> {
        if request.password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }
        let password_hash = hash_password(&request.password)?;
        Ok(Self {
            name: request.name,
            email: request.email,
            role: request.role,
            password_hash,
        })
    }
}

/// Successful login: the employee's public record plus a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    pub employee: Employee,
    pub token: String,
}

pub struct IdentityService<E: EmployeeRepository> {
    repo: E,
    sessions: SessionService,
}

impl<'conn> IdentityService<SqliteEmployeeRepository<'conn>> {
    /// Builds the service over SQLite repositories on `conn`.
    pub fn open(conn: &'conn Connection, sessions: SessionService) -> RepoResult<Self> {
        Ok(Self::new(SqliteEmployeeRepository::try_new(conn)?, sessions))
    }
}

impl<E: EmployeeRepository> IdentityService<E> {
    pub fn new(repo: E, sessions: SessionService) -> Self {
        Self { repo, sessions }
    }

    /// Registers a new employee under the next sequential id.
    ///
    /// # Errors
    /// - `Duplicate` when the email (or the allocated id) is already taken.
    /// - `Validation` for a blank name/email or an empty password.
    pub fn register(&self, request: NewEmployee) -> ServiceResult<EmployeeId> {
        self.register_hashed(HashedRegistration::hash(request)?)
    }

    /// Stores a registration whose password was hashed beforehand.
    pub fn register_hashed(&self, registration: HashedRegistration) -> ServiceResult<EmployeeId> {
        let id = self.repo.next_employee_id()?;
        let employee = Employee::new(id, registration.name, registration.email, registration.role);
        employee.validate()?;
        self.repo.create_employee(&employee, &registration.password_hash)?;

        info!(
            "event=employee_registered module=identity employee_id={id} role={}",
            employee.role.as_str()
        );
        Ok(id)
    }

    /// Verifies credentials and issues a session token.
    pub fn authenticate(&self, email: &str, password: &str) -> ServiceResult<LoginSession> {
        let credentials = self.credentials_for(email)?;
        open_session(&self.sessions, credentials, password)
    }

    /// Looks up the stored credentials for a login attempt.
    ///
    /// An unknown email is reported as `InvalidCredentials`, like a wrong
    /// password.
    pub fn credentials_for(&self, email: &str) -> ServiceResult<EmployeeCredentials> {
        self.repo.find_credentials_by_email(email)?.ok_or_else(|| {
            warn!("event=login_rejected module=identity reason=unknown_email");
            ServiceError::InvalidCredentials
        })
    }

    /// Resolves a bearer token to the caller it was issued for.
    ///
    /// Expired and malformed tokens both yield `Unauthorized`.
    pub fn resolve_session(&self, token: &str) -> ServiceResult<Caller> {
        resolve_session(&self.sessions, token)
    }

    /// The caller's own public record.
    pub fn current_employee(&self, caller: &Caller) -> ServiceResult<Employee> {
        self.repo
            .get_employee(caller.employee_id)?
            .ok_or_else(|| not_found(EntityKind::Employee, caller.employee_id))
    }

    pub fn get_employee(&self, caller: &Caller, id: EmployeeId) -> ServiceResult<Employee> {
        ensure_allowed(caller, Operation::ViewEmployee, Some(id))?;
        self.repo
            .get_employee(id)?
            .ok_or_else(|| not_found(EntityKind::Employee, id))
    }

    pub fn list_employees(&self, caller: &Caller) -> ServiceResult<Vec<Employee>> {
        ensure_allowed(caller, Operation::ListEmployees, None)?;
        Ok(self.repo.list_employees()?)
    }
}

/// Checks `password` against looked-up credentials and issues a token.
///
/// Needs no store access, so callers can run it after releasing the store.
pub fn open_session(
    sessions: &SessionService,
    credentials: EmployeeCredentials,
    password: &str,
) -> ServiceResult<LoginSession> {
    if !verify_password(password, &credentials.password_hash) {
        warn!(
            "event=login_rejected module=identity employee_id={} reason=bad_password",
            credentials.employee.id
        );
        return Err(ServiceError::InvalidCredentials);
    }

    let token = sessions
        .issue(&credentials.employee)
        .map_err(ServiceError::TokenIssue)?;

    info!(
        "event=login module=identity status=ok employee_id={}",
        credentials.employee.id
    );
    Ok(LoginSession {
        employee: credentials.employee,
        token,
    })
}

/// Verifies `token` without touching the identity store.
pub fn resolve_session(sessions: &SessionService, token: &str) -> ServiceResult<Caller> {
    match sessions.verify(token) {
        Ok(claims) => Ok(claims.caller()),
        Err(err) => {
            debug!("event=session_rejected module=identity reason={err}");
            Err(ServiceError::Unauthorized(err))
        }
    }
}
