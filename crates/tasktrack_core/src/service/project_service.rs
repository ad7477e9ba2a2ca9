//! Project use-cases.

use super::{ensure_allowed, not_found, ServiceResult};
use crate::model::project::{Project, ProjectId};
use crate::model::task::Task;
use crate::model::EntityKind;
use crate::policy::{can_see_task, Caller, Operation};
use crate::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::RepoResult;
use log::info;
use rusqlite::Connection;

pub struct ProjectService<P: ProjectRepository, T: TaskRepository> {
    projects: P,
    tasks: T,
}

impl<'conn> ProjectService<SqliteProjectRepository<'conn>, SqliteTaskRepository<'conn>> {
    pub fn open(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteProjectRepository::try_new(conn)?,
            SqliteTaskRepository::try_new(conn)?,
        ))
    }
}

impl<P: ProjectRepository, T: TaskRepository> ProjectService<P, T> {
    pub fn new(projects: P, tasks: T) -> Self {
        Self { projects, tasks }
    }

    /// Creates a project owned by the calling manager.
    pub fn create_project(
        &self,
        caller: &Caller,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> ServiceResult<ProjectId> {
        ensure_allowed(caller, Operation::CreateProject, None)?;

        let id = self.projects.next_project_id()?;
        let project = Project::new(id, name, description, caller.employee_id);
        self.projects.create_project(&project)?;

        info!(
            "event=project_created module=project project_id={id} created_by={}",
            caller.employee_id
        );
        Ok(id)
    }

    pub fn list_projects(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.projects.list_projects()?)
    }

    pub fn get_project(&self, id: ProjectId) -> ServiceResult<Project> {
        self.projects
            .get_project(id)?
            .ok_or_else(|| not_found(EntityKind::Project, id))
    }

    /// Tasks linked to the project, narrowed to the caller's own tasks for
    /// employees.
    pub fn project_tasks(&self, caller: &Caller, id: ProjectId) -> ServiceResult<Vec<Task>> {
        self.get_project(id)?;
        let mut tasks = self.tasks.list_tasks_by_project(id)?;
        tasks.retain(|task| can_see_task(caller, task));
        Ok(tasks)
    }
}
