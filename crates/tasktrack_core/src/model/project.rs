//! Project records. Immutable after creation.

use super::employee::EmployeeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ProjectId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "project_id")]
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    /// Manager who created the project.
    pub created_by: EmployeeId,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(
        id: ProjectId,
        name: impl Into<String>,
        description: impl Into<String>,
        created_by: EmployeeId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            created_by,
            created_at: Utc::now(),
        }
    }
}
