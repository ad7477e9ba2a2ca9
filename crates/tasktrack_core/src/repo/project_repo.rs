//! Project repository contracts and SQLite implementation.

use super::{
    ensure_connection_ready, next_sequential_id, parse_millis, to_millis, RepoError, RepoResult,
};
use crate::model::project::{Project, ProjectId};
use crate::model::EntityKind;
use rusqlite::{params, Connection, Row};

const PROJECT_SELECT_SQL: &str = "SELECT
    project_id,
    name,
    description,
    created_by,
    created_at
FROM projects";

/// Repository interface for the project store.
///
/// Task listings per project live on `TaskRepository::list_tasks_by_project`.
pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
    fn next_project_id(&self) -> RepoResult<ProjectId>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["projects"])?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        if self.get_project(project.id)?.is_some() {
            return Err(RepoError::Duplicate {
                entity: EntityKind::Project,
                key: project.id.to_string(),
            });
        }

        self.conn.execute(
            "INSERT INTO projects (
                project_id,
                name,
                description,
                created_by,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                project.id,
                project.name.as_str(),
                project.description.as_str(),
                project.created_by,
                to_millis(project.created_at),
            ],
        )?;

        Ok(project.id)
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE project_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY project_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn next_project_id(&self) -> RepoResult<ProjectId> {
        next_sequential_id(self.conn, "projects", "project_id")
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    Ok(Project {
        id: row.get("project_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_by: row.get("created_by")?,
        created_at: parse_millis(row.get("created_at")?, "projects.created_at")?,
    })
}
