//! Employee identity records.
//!
//! # Invariants
//! - `email` is the natural key; `id` is the surrogate key.
//! - The credential hash never leaves the persistence boundary except through
//!   `EmployeeCredentials`.

use super::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type EmployeeId = i64;

/// Access role carried by every employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Employee,
    Manager,
}

impl Role {
    /// Stable storage/wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Manager => "Manager",
        }
    }

    /// Parses the stable storage/wire string.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Employee" => Some(Self::Employee),
            "Manager" => Some(Self::Manager),
            _ => None,
        }
    }

    pub fn is_manager(self) -> bool {
        matches!(self, Self::Manager)
    }
}

/// Public view of an employee. Never carries the credential hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "employee_id")]
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    /// Builds a record stamped with the current time.
    pub fn new(
        id: EmployeeId,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::BlankEmail);
        }
        Ok(())
    }
}

/// Employee record paired with its stored credential hash.
///
/// Only the identity service reads this shape, to verify a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeCredentials {
    pub employee: Employee,
    /// PHC-formatted salted password hash.
    pub password_hash: String,
}

/// Registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}
