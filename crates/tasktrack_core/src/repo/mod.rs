//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define per-collection data access contracts (employees, projects, tasks).
//! - Isolate SQL details from service orchestration.
//!
//! # Invariants
//! - Repositories only accept connections whose schema is fully migrated.
//! - Write paths validate records before SQL mutations.
//! - An empty result and a storage failure are never conflated: failures are
//!   always returned as `RepoError`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::{timestamp_from_millis, EntityKind, ValidationError};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod employee_repo;
pub mod project_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// A record with the same id or natural key already exists.
    Duplicate {
        entity: EntityKind,
        key: String,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Duplicate { entity, key } => {
                write!(f, "{} already exists: {key}", entity.label().to_lowercase())
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Rejects connections that were not opened through `db::open_db*`.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    required_tables: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in required_tables {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

/// Returns `max(id) + 1`, or 1 for an empty table. Gaps are never reused.
pub(crate) fn next_sequential_id(
    conn: &Connection,
    table: &'static str,
    id_column: &'static str,
) -> RepoResult<i64> {
    let max: Option<i64> = conn.query_row(
        &format!("SELECT MAX({id_column}) FROM {table};"),
        [],
        |row| row.get(0),
    )?;
    Ok(max.map_or(1, |value| value + 1))
}

pub(crate) fn to_millis(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

pub(crate) fn parse_millis(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    timestamp_from_millis(value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}")))
}
