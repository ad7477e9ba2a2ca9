//! Dashboard statistics for the caller's scope.

use super::ServiceResult;
use crate::dashboard::{aggregate, DashboardStats};
use crate::policy::Caller;
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::RepoResult;
use rusqlite::Connection;

pub struct DashboardService<T: TaskRepository> {
    tasks: T,
}

impl<'conn> DashboardService<SqliteTaskRepository<'conn>> {
    pub fn open(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(SqliteTaskRepository::try_new(conn)?))
    }
}

impl<T: TaskRepository> DashboardService<T> {
    pub fn new(tasks: T) -> Self {
        Self { tasks }
    }

    /// Managers see every task and every time log entry. Employees see
    /// their assigned tasks, while hours come from the entries they wrote
    /// themselves on any task.
    pub fn stats(&self, caller: &Caller) -> ServiceResult<DashboardStats> {
        if caller.is_manager() {
            let tasks = self.tasks.list_tasks()?;
            let logs = tasks.iter().flat_map(|task| task.time_logs.iter());
            return Ok(aggregate(&tasks, logs));
        }

        let tasks = self.tasks.list_tasks_for_employee(caller.employee_id)?;
        let logs = self.tasks.list_time_logs_for_employee(caller.employee_id)?;
        Ok(aggregate(&tasks, logs.iter().map(|entry| &entry.log)))
    }
}
