//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist tasks together with their ordered time log.
//! - Provide the single-write mutations used by services (status, project,
//!   time-log append), each reporting whether a row actually changed.
//!
//! # Invariants
//! - A task is always read back with its full time log, in insertion order.
//! - Every successful mutation refreshes `updated_at`.
//! - A mutation that targets a missing id, or writes the value already stored,
//!   reports `false` and leaves the row untouched.

use super::{
    ensure_connection_ready, next_sequential_id, parse_millis, to_millis, RepoError, RepoResult,
};
use crate::model::employee::EmployeeId;
use crate::model::project::ProjectId;
use crate::model::task::{EmployeeTimeLog, Task, TaskId, TaskPriority, TaskStatus, TimeLog};
use crate::model::EntityKind;
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    task_id,
    title,
    description,
    assigned_to,
    priority,
    status,
    project_id,
    created_at,
    updated_at
FROM tasks";

const TIME_LOG_SELECT_SQL: &str = "SELECT
    employee_id,
    hours,
    description,
    logged_at
FROM time_logs
WHERE task_id = ?1
ORDER BY seq ASC;";

/// Repository interface for the task store.
pub trait TaskRepository {
    /// Inserts one task (and any embedded log entries); fails with
    /// `Duplicate` when the id is taken.
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self) -> RepoResult<Vec<Task>>;
    fn list_tasks_for_employee(&self, employee_id: EmployeeId) -> RepoResult<Vec<Task>>;
    fn list_tasks_by_project(&self, project_id: ProjectId) -> RepoResult<Vec<Task>>;
    /// Tasks whose project linkage is absent.
    fn list_tasks_without_project(&self) -> RepoResult<Vec<Task>>;
    fn update_status(&self, id: TaskId, status: TaskStatus) -> RepoResult<bool>;
    fn append_time_log(&self, id: TaskId, log: &TimeLog) -> RepoResult<bool>;
    fn set_project(&self, id: TaskId, project_id: Option<ProjectId>) -> RepoResult<bool>;
    /// Every log entry made by `employee_id`, annotated with its task.
    ///
    /// Ordered by task id, then by insertion order within each task.
    fn list_time_logs_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> RepoResult<Vec<EmployeeTimeLog>>;
    fn next_task_id(&self) -> RepoResult<TaskId>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["tasks", "time_logs"])?;
        Ok(Self { conn })
    }

    fn query_tasks(&self, filter: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Task>> {
        let sql = format!("{TASK_SELECT_SQL} {filter} ORDER BY task_id ASC;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;

        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        for task in &mut tasks {
            task.time_logs = self.load_time_logs(task.id)?;
        }
        Ok(tasks)
    }

    fn load_time_logs(&self, task_id: TaskId) -> RepoResult<Vec<TimeLog>> {
        let mut stmt = self.conn.prepare_cached(TIME_LOG_SELECT_SQL)?;
        let mut rows = stmt.query([task_id])?;
        let mut logs = Vec::new();
        while let Some(row) = rows.next()? {
            logs.push(parse_time_log_row(row)?);
        }
        Ok(logs)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM tasks WHERE task_id = ?1);",
            [task.id],
            |row| row.get(0),
        )?;
        if exists {
            return Err(RepoError::Duplicate {
                entity: EntityKind::Task,
                key: task.id.to_string(),
            });
        }

        tx.execute(
            "INSERT INTO tasks (
                task_id,
                title,
                description,
                assigned_to,
                priority,
                status,
                project_id,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                task.id,
                task.title.as_str(),
                task.description.as_str(),
                task.assigned_to,
                task.priority.as_str(),
                task.status.as_str(),
                task.project_id,
                to_millis(task.created_at),
                to_millis(task.updated_at),
            ],
        )?;
        for (index, log) in task.time_logs.iter().enumerate() {
            insert_time_log(&tx, task.id, index as i64 + 1, log)?;
        }
        tx.commit()?;

        Ok(task.id)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut tasks = self.query_tasks("WHERE task_id = ?", vec![Value::Integer(id)])?;
        Ok(tasks.pop())
    }

    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        self.query_tasks("", Vec::new())
    }

    fn list_tasks_for_employee(&self, employee_id: EmployeeId) -> RepoResult<Vec<Task>> {
        self.query_tasks("WHERE assigned_to = ?", vec![Value::Integer(employee_id)])
    }

    fn list_tasks_by_project(&self, project_id: ProjectId) -> RepoResult<Vec<Task>> {
        self.query_tasks("WHERE project_id = ?", vec![Value::Integer(project_id)])
    }

    fn list_tasks_without_project(&self) -> RepoResult<Vec<Task>> {
        self.query_tasks("WHERE project_id IS NULL", Vec::new())
    }

    fn update_status(&self, id: TaskId, status: TaskStatus) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                status = ?2,
                updated_at = ?3
             WHERE task_id = ?1
               AND status <> ?2;",
            params![id, status.as_str(), to_millis(Utc::now())],
        )?;
        Ok(changed > 0)
    }

    fn append_time_log(&self, id: TaskId, log: &TimeLog) -> RepoResult<bool> {
        log.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let touched = tx.execute(
            "UPDATE tasks SET updated_at = ?2 WHERE task_id = ?1;",
            params![id, to_millis(Utc::now())],
        )?;
        if touched == 0 {
            return Ok(false);
        }

        let seq: i64 = tx.query_row(
            "SELECT COALESCE(MAX(seq), 0) + 1 FROM time_logs WHERE task_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        insert_time_log(&tx, id, seq, log)?;
        tx.commit()?;

        Ok(true)
    }

    fn set_project(&self, id: TaskId, project_id: Option<ProjectId>) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                project_id = ?2,
                updated_at = ?3
             WHERE task_id = ?1
               AND project_id IS NOT ?2;",
            params![id, project_id, to_millis(Utc::now())],
        )?;
        Ok(changed > 0)
    }

    fn list_time_logs_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> RepoResult<Vec<EmployeeTimeLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                l.employee_id,
                l.hours,
                l.description,
                l.logged_at,
                t.task_id,
                t.title
             FROM time_logs l
             JOIN tasks t ON t.task_id = l.task_id
             WHERE l.employee_id = ?1
             ORDER BY t.task_id ASC, l.seq ASC;",
        )?;
        let mut rows = stmt.query([employee_id])?;
        let mut logs = Vec::new();
        while let Some(row) = rows.next()? {
            logs.push(EmployeeTimeLog {
                log: parse_time_log_row(row)?,
                task_id: row.get("task_id")?,
                task_title: row.get("title")?,
            });
        }
        Ok(logs)
    }

    fn next_task_id(&self) -> RepoResult<TaskId> {
        next_sequential_id(self.conn, "tasks", "task_id")
    }
}

fn insert_time_log(conn: &Connection, task_id: TaskId, seq: i64, log: &TimeLog) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO time_logs (
            task_id,
            seq,
            employee_id,
            hours,
            description,
            logged_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            task_id,
            seq,
            log.employee_id,
            log.hours,
            log.description.as_str(),
            to_millis(log.logged_at),
        ],
    )?;
    Ok(())
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let priority_text: String = row.get("priority")?;
    let priority = TaskPriority::parse(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid priority `{priority_text}` in tasks.priority"))
    })?;

    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in tasks.status"))
    })?;

    Ok(Task {
        id: row.get("task_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        assigned_to: row.get("assigned_to")?,
        priority,
        status,
        project_id: row.get("project_id")?,
        created_at: parse_millis(row.get("created_at")?, "tasks.created_at")?,
        updated_at: parse_millis(row.get("updated_at")?, "tasks.updated_at")?,
        time_logs: Vec::new(),
    })
}

fn parse_time_log_row(row: &Row<'_>) -> RepoResult<TimeLog> {
    Ok(TimeLog {
        employee_id: row.get("employee_id")?,
        hours: row.get("hours")?,
        description: row.get("description")?,
        logged_at: parse_millis(row.get("logged_at")?, "time_logs.logged_at")?,
    })
}
