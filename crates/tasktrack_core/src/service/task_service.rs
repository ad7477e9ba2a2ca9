//! Task use-cases: creation, visibility, status, time logging and project
//! links.
//!
//! # Invariants
//! - Task ids are allocated as max+1 over the task store.
//! - Assignee and project references are checked before a task is stored.
//! - Time log entries carry the caller's id, not the assignee's.

use super::{ensure_allowed, not_found, ServiceError, ServiceResult};
use crate::model::employee::EmployeeId;
use crate::model::project::ProjectId;
use crate::model::task::{EmployeeTimeLog, NewTask, Task, TaskId, TaskStatus, TimeLog};
use crate::model::EntityKind;
use crate::policy::{Caller, Operation};
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::RepoResult;
use log::info;
use rusqlite::Connection;

pub struct TaskService<T: TaskRepository, P: ProjectRepository, E: EmployeeRepository> {
    tasks: T,
    projects: P,
    employees: E,
}

impl<'conn>
    TaskService<
        SqliteTaskRepository<'conn>,
        SqliteProjectRepository<'conn>,
        SqliteEmployeeRepository<'conn>,
    >
{
    pub fn open(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteTaskRepository::try_new(conn)?,
            SqliteProjectRepository::try_new(conn)?,
            SqliteEmployeeRepository::try_new(conn)?,
        ))
    }
}

impl<T: TaskRepository, P: ProjectRepository, E: EmployeeRepository> TaskService<T, P, E> {
    pub fn new(tasks: T, projects: P, employees: E) -> Self {
        Self {
            tasks,
            projects,
            employees,
        }
    }

    /// Creates a task with status `Pending`, no time logs and fresh
    /// timestamps.
    ///
    /// # Errors
    /// - `Forbidden` for non-managers.
    /// - `NotFound` when the assignee or the referenced project is missing.
    pub fn create_task(&self, caller: &Caller, request: NewTask) -> ServiceResult<TaskId> {
        ensure_allowed(caller, Operation::CreateTask, None)?;

        if self.employees.get_employee(request.assigned_to)?.is_none() {
            return Err(not_found(EntityKind::Employee, request.assigned_to));
        }
        if let Some(project_id) = request.project_id {
            self.require_project(project_id)?;
        }

        let id = self.tasks.next_task_id()?;
        let task = Task::new(id, request);
        task.validate()?;
        self.tasks.create_task(&task)?;

        info!(
            "event=task_created module=task task_id={id} assigned_to={} priority={} caller={}",
            task.assigned_to,
            task.priority.as_str(),
            caller.employee_id
        );
        Ok(id)
    }

    pub fn get_task(&self, caller: &Caller, id: TaskId) -> ServiceResult<Task> {
        let task = self.load_task(id)?;
        ensure_allowed(caller, Operation::ViewTask, Some(task.assigned_to))?;
        Ok(task)
    }

    /// All tasks for managers, the caller's own tasks otherwise.
    pub fn list_tasks(&self, caller: &Caller) -> ServiceResult<Vec<Task>> {
        let tasks = if caller.is_manager() {
            self.tasks.list_tasks()?
        } else {
            self.tasks.list_tasks_for_employee(caller.employee_id)?
        };
        Ok(tasks)
    }

    /// Sets the task status and bumps `updated_at`.
    ///
    /// Writing the status the task already has is reported as a failed
    /// update.
    pub fn update_status(
        &self,
        caller: &Caller,
        id: TaskId,
        status: TaskStatus,
    ) -> ServiceResult<()> {
        let task = self.load_task(id)?;
        ensure_allowed(caller, Operation::UpdateTaskStatus, Some(task.assigned_to))?;

        if !self.tasks.update_status(id, status)? {
            return Err(ServiceError::OperationFailed("Failed to update task status"));
        }
        info!(
            "event=task_status_updated module=task task_id={id} status={} caller={}",
            status.as_str(),
            caller.employee_id
        );
        Ok(())
    }

    /// Appends a time log entry attributed to the caller.
    pub fn log_time(
        &self,
        caller: &Caller,
        id: TaskId,
        hours: f64,
        description: impl Into<String>,
    ) -> ServiceResult<()> {
        let task = self.load_task(id)?;
        ensure_allowed(caller, Operation::LogTime, Some(task.assigned_to))?;

        let log = TimeLog::new(caller.employee_id, hours, description);
        log.validate()?;
        if !self.tasks.append_time_log(id, &log)? {
            return Err(ServiceError::OperationFailed("Failed to add time log"));
        }
        info!(
            "event=time_logged module=task task_id={id} employee_id={} hours={hours}",
            caller.employee_id
        );
        Ok(())
    }

    /// The task's embedded time logs in insertion order.
    pub fn task_time_logs(&self, caller: &Caller, id: TaskId) -> ServiceResult<Vec<TimeLog>> {
        let task = self.load_task(id)?;
        ensure_allowed(caller, Operation::ViewTaskTimeLogs, Some(task.assigned_to))?;
        Ok(task.time_logs)
    }

    /// Every time log entry written by `employee_id`, across all tasks.
    pub fn employee_time_logs(
        &self,
        caller: &Caller,
        employee_id: EmployeeId,
    ) -> ServiceResult<Vec<EmployeeTimeLog>> {
        ensure_allowed(caller, Operation::ViewEmployeeTimeLogs, Some(employee_id))?;
        Ok(self.tasks.list_time_logs_for_employee(employee_id)?)
    }

    /// Links the task to `project_id`, or unlinks it when `None`.
    pub fn reassign_project(
        &self,
        caller: &Caller,
        id: TaskId,
        project_id: Option<ProjectId>,
    ) -> ServiceResult<()> {
        ensure_allowed(caller, Operation::ReassignTaskProject, None)?;
        self.load_task(id)?;
        if let Some(project_id) = project_id {
            self.require_project(project_id)?;
        }

        if !self.tasks.set_project(id, project_id)? {
            return Err(ServiceError::OperationFailed("Failed to update task project"));
        }
        info!(
            "event=task_project_updated module=task task_id={id} project_id={} caller={}",
            project_id.map_or_else(|| "none".to_string(), |value| value.to_string()),
            caller.employee_id
        );
        Ok(())
    }

    pub fn tasks_without_project(&self, caller: &Caller) -> ServiceResult<Vec<Task>> {
        ensure_allowed(caller, Operation::ListTasksWithoutProject, None)?;
        Ok(self.tasks.list_tasks_without_project()?)
    }

    fn load_task(&self, id: TaskId) -> ServiceResult<Task> {
        self.tasks
            .get_task(id)?
            .ok_or_else(|| not_found(EntityKind::Task, id))
    }

    fn require_project(&self, id: ProjectId) -> ServiceResult<()> {
        match self.projects.get_project(id)? {
            Some(_) => Ok(()),
            None => Err(not_found(EntityKind::Project, id)),
        }
    }
}
