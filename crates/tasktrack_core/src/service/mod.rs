//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls behind access-policy checks.
//! - Translate repository outcomes into one caller-facing error taxonomy.
//!
//! # Invariants
//! - Existence is checked before ownership: a missing target is `NotFound`,
//!   an existing but foreign target is `Forbidden`.
//! - Store failures are logged once here and surfaced as `Store`, never as an
//!   empty result.

use crate::auth::password::CredentialError;
use crate::auth::session::SessionError;
use crate::model::{EntityKind, ValidationError};
use crate::policy::{authorize, Caller, Decision, DenyReason, Operation};
use crate::repo::RepoError;
use log::{error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod dashboard_service;
pub mod identity_service;
pub mod project_service;
pub mod task_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    NotFound { entity: EntityKind, id: i64 },
    Forbidden(DenyReason),
    /// Missing, invalid or expired session.
    Unauthorized(SessionError),
    /// Unknown email or wrong password; deliberately unspecific.
    InvalidCredentials,
    /// Signing a new session token failed.
    TokenIssue(SessionError),
    Duplicate(EntityKind),
    Validation(ValidationError),
    /// The store accepted the request but modified nothing.
    OperationFailed(&'static str),
    Store(RepoError),
    Credential(CredentialError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, .. } => write!(f, "{entity} not found"),
            Self::Forbidden(DenyReason::ManagerRequired) => write!(f, "Manager access required"),
            Self::Forbidden(DenyReason::NotOwner) => write!(f, "Access denied"),
            Self::Unauthorized(_) => write!(f, "Invalid authentication credentials"),
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::Duplicate(entity) => write!(f, "{entity} already exists"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::OperationFailed(message) => f.write_str(message),
            Self::TokenIssue(_) | Self::Store(_) | Self::Credential(_) => {
                write!(f, "Internal server error")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unauthorized(err) | Self::TokenIssue(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Credential(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Duplicate { entity, key } => {
                warn!("event=store_duplicate module=service entity={entity} key={key}");
                Self::Duplicate(entity)
            }
            RepoError::Validation(err) => Self::Validation(err),
            other => {
                error!("event=store_error module=service status=error error={other}");
                Self::Store(other)
            }
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<CredentialError> for ServiceError {
    fn from(value: CredentialError) -> Self {
        error!("event=credential_error module=service status=error error={value}");
        Self::Credential(value)
    }
}

/// Consults the access policy and turns a denial into `Forbidden`.
pub(crate) fn ensure_allowed(
    caller: &Caller,
    operation: Operation,
    target_owner: Option<i64>,
) -> ServiceResult<()> {
    match authorize(caller, operation, target_owner) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => {
            warn!(
                "event=access_denied module=policy operation={} caller={} reason={reason:?}",
                operation.as_str(),
                caller.employee_id
            );
            Err(ServiceError::Forbidden(reason))
        }
    }
}

pub(crate) fn not_found(entity: EntityKind, id: i64) -> ServiceError {
    ServiceError::NotFound { entity, id }
}
