//! Task records and their embedded time log.
//!
//! # Responsibility
//! - Define task lifecycle enums with stable wire/storage strings.
//! - Own total-hours derivation and time-log validation.
//!
//! # Invariants
//! - `time_logs` is append-only and keeps insertion order.
//! - `total_hours()` is recomputed from `time_logs` on every call.
//! - `updated_at` moves forward on every mutation.

use super::employee::EmployeeId;
use super::project::ProjectId;
use super::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TaskId = i64;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(Self::Pending),
            "In Progress" => Some(Self::InProgress),
            "Completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Task priority. Defaults to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            _ => None,
        }
    }
}

/// One entry of a task's time log. Not addressable outside its task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeLog {
    /// Employee who logged the time (the caller, not necessarily the assignee).
    pub employee_id: EmployeeId,
    pub hours: f64,
    pub description: String,
    pub logged_at: DateTime<Utc>,
}

impl TimeLog {
    pub fn new(employee_id: EmployeeId, hours: f64, description: impl Into<String>) -> Self {
        Self {
            employee_id,
            hours,
            description: description.into(),
            logged_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.hours.is_finite() || self.hours < 0.0 {
            return Err(ValidationError::InvalidHours(self.hours));
        }
        Ok(())
    }
}

/// Time-log entry annotated with its owning task, for cross-task views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeTimeLog {
    #[serde(flatten)]
    pub log: TimeLog,
    pub task_id: TaskId,
    pub task_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "task_id")]
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub assigned_to: EmployeeId,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// `None` means the task is not linked to any project.
    pub project_id: Option<ProjectId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub time_logs: Vec<TimeLog>,
}

impl Task {
    /// Builds a pending task with an empty time log.
    pub fn new(id: TaskId, request: NewTask) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: request.title,
            description: request.description,
            assigned_to: request.assigned_to,
            priority: request.priority,
            status: TaskStatus::Pending,
            project_id: request.project_id,
            created_at: now,
            updated_at: now,
            time_logs: Vec::new(),
        }
    }

    /// Sum of hours across the time log.
    pub fn total_hours(&self) -> f64 {
        self.time_logs.iter().map(|log| log.hours).sum()
    }

    pub fn is_assigned_to(&self, employee_id: EmployeeId) -> bool {
        self.assigned_to == employee_id
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.time_logs.iter().try_for_each(TimeLog::validate)
    }
}

/// Task creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub assigned_to: EmployeeId,
    pub priority: TaskPriority,
    pub project_id: Option<ProjectId>,
}

impl NewTask {
    /// Medium priority, no project.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        assigned_to: EmployeeId,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            assigned_to,
            priority: TaskPriority::default(),
            project_id: None,
        }
    }
}
