//! Employee repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `email` is unique; duplicates are reported as `RepoError::Duplicate`.
//! - Read models never expose `password_hash` except via
//!   `find_credentials_by_email`.

use super::{
    ensure_connection_ready, next_sequential_id, parse_millis, to_millis, RepoError, RepoResult,
};
use crate::model::employee::{Employee, EmployeeCredentials, EmployeeId, Role};
use crate::model::EntityKind;
use rusqlite::{params, Connection, OptionalExtension, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    employee_id,
    name,
    email,
    role,
    created_at
FROM employees";

/// Repository interface for the identity store.
pub trait EmployeeRepository {
    /// Inserts one employee; fails with `Duplicate` on id or email collision.
    fn create_employee(&self, employee: &Employee, password_hash: &str) -> RepoResult<EmployeeId>;
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    fn find_credentials_by_email(&self, email: &str) -> RepoResult<Option<EmployeeCredentials>>;
    /// Lists every employee ordered by id.
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    fn next_employee_id(&self) -> RepoResult<EmployeeId>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["employees"])?;
        Ok(Self { conn })
    }

    fn id_exists(&self, id: EmployeeId) -> RepoResult<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE employee_id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE email = ?1);",
            [email],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, employee: &Employee, password_hash: &str) -> RepoResult<EmployeeId> {
        employee.validate()?;

        if self.id_exists(employee.id)? {
            return Err(RepoError::Duplicate {
                entity: EntityKind::Employee,
                key: employee.id.to_string(),
            });
        }
        if self.email_exists(&employee.email)? {
            return Err(RepoError::Duplicate {
                entity: EntityKind::Employee,
                key: employee.email.clone(),
            });
        }

        self.conn.execute(
            "INSERT INTO employees (
                employee_id,
                name,
                email,
                password_hash,
                role,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                employee.id,
                employee.name.as_str(),
                employee.email.as_str(),
                password_hash,
                employee.role.as_str(),
                to_millis(employee.created_at),
            ],
        )?;

        Ok(employee.id)
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE employee_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }
        Ok(None)
    }

    fn find_credentials_by_email(&self, email: &str) -> RepoResult<Option<EmployeeCredentials>> {
        let found = self
            .conn
            .query_row(
                "SELECT employee_id, password_hash FROM employees WHERE email = ?1;",
                [email],
                |row| Ok((row.get::<_, EmployeeId>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        let Some((id, password_hash)) = found else {
            return Ok(None);
        };
        let employee = self.get_employee(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("employee {id} vanished during credential lookup"))
        })?;

        Ok(Some(EmployeeCredentials {
            employee,
            password_hash,
        }))
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY employee_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }

    fn next_employee_id(&self) -> RepoResult<EmployeeId> {
        next_sequential_id(self.conn, "employees", "employee_id")
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let role_text: String = row.get("role")?;
    let role = Role::parse(&role_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid role `{role_text}` in employees.role"))
    })?;

    Ok(Employee {
        id: row.get("employee_id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        role,
        created_at: parse_millis(row.get("created_at")?, "employees.created_at")?,
    })
}
