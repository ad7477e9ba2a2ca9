//! Domain model for employees, projects, tasks and time logs.
//!
//! # Responsibility
//! - Define canonical record shapes shared by persistence and services.
//! - Own write-side validation rules for every record kind.
//!
//! # Invariants
//! - Ids are sequential integers allocated as `max + 1` per collection.
//! - A task's total hours are always derived from its time log.
//! - Role is a plain field on `Employee`; there is no manager subtype.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod employee;
pub mod project;
pub mod task;

/// Record collections addressed by sequential integer ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Employee,
    Project,
    Task,
}

impl EntityKind {
    /// Human-readable label used in caller-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Project => "Project",
            Self::Task => "Task",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Write-side validation failures for domain records.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Employee name is blank after trim.
    BlankName,
    /// Employee email is blank after trim.
    BlankEmail,
    /// Password is empty.
    EmptyPassword,
    /// Logged hours are negative, NaN or infinite.
    InvalidHours(f64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "name must not be blank"),
            Self::BlankEmail => write!(f, "email must not be blank"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::InvalidHours(hours) => {
                write!(f, "hours must be a finite non-negative number, got {hours}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Converts epoch milliseconds into a UTC timestamp.
pub(crate) fn timestamp_from_millis(value: i64) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(value)
}
