//! Role and ownership access policy.
//!
//! # Responsibility
//! - Decide allow/deny for every gated operation from the caller's identity,
//!   role and the target record's owner.
//!
//! # Invariants
//! - Managers are allowed on every operation.
//! - Employees are allowed on owner-scoped operations only when they own the
//!   target, and never on manager-only operations.
//! - The policy is pure: existence checks happen before it is consulted, so a
//!   missing target is reported as not-found rather than denied.

use crate::model::employee::{EmployeeId, Role};
use crate::model::task::Task;

/// Authenticated identity a request acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Caller {
    pub employee_id: EmployeeId,
    pub role: Role,
}

impl Caller {
    pub fn new(employee_id: EmployeeId, role: Role) -> Self {
        Self { employee_id, role }
    }

    pub fn is_manager(&self) -> bool {
        self.role.is_manager()
    }
}

/// Gated operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListEmployees,
    /// Reading another employee's record by id.
    ViewEmployee,
    CreateTask,
    ViewTask,
    UpdateTaskStatus,
    LogTime,
    ViewTaskTimeLogs,
    /// Reading one employee's flattened time logs.
    ViewEmployeeTimeLogs,
    CreateProject,
    ReassignTaskProject,
    ListTasksWithoutProject,
}

/// Why an operation was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    ManagerRequired,
    NotOwner,
}

/// Policy outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// How an operation is scoped for employees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    ManagerOnly,
    /// Allowed when the target owner equals the caller.
    Owner,
}

impl Operation {
    fn scope(self) -> Scope {
        match self {
            Self::ListEmployees
            | Self::ViewEmployee
            | Self::CreateTask
            | Self::CreateProject
            | Self::ReassignTaskProject
            | Self::ListTasksWithoutProject => Scope::ManagerOnly,
            Self::ViewTask
            | Self::UpdateTaskStatus
            | Self::LogTime
            | Self::ViewTaskTimeLogs
            | Self::ViewEmployeeTimeLogs => Scope::Owner,
        }
    }

    /// Stable name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListEmployees => "list_employees",
            Self::ViewEmployee => "view_employee",
            Self::CreateTask => "create_task",
            Self::ViewTask => "view_task",
            Self::UpdateTaskStatus => "update_task_status",
            Self::LogTime => "log_time",
            Self::ViewTaskTimeLogs => "view_task_time_logs",
            Self::ViewEmployeeTimeLogs => "view_employee_time_logs",
            Self::CreateProject => "create_project",
            Self::ReassignTaskProject => "reassign_task_project",
            Self::ListTasksWithoutProject => "list_tasks_without_project",
        }
    }
}

/// Decides whether `caller` may perform `operation` on a target owned by
/// `target_owner`.
///
/// For task operations the owner is the assignee; for employee time logs it
/// is the employee whose logs are requested. `None` means there is no owner,
/// which only a manager can act on.
pub fn authorize(
    caller: &Caller,
    operation: Operation,
    target_owner: Option<EmployeeId>,
) -> Decision {
    if caller.is_manager() {
        return Decision::Allow;
    }

    match operation.scope() {
        Scope::ManagerOnly => Decision::Deny(DenyReason::ManagerRequired),
        Scope::Owner if target_owner == Some(caller.employee_id) => Decision::Allow,
        Scope::Owner => Decision::Deny(DenyReason::NotOwner),
    }
}

/// Whether `caller` may see `task` in a listing.
pub fn can_see_task(caller: &Caller, task: &Task) -> bool {
    authorize(caller, Operation::ViewTask, Some(task.assigned_to)).is_allowed()
}

#[cfg(test)]
mod tests {
    use super::{authorize, can_see_task, Caller, Decision, DenyReason, Operation};
    use crate::model::employee::Role;
    use crate::model::task::{NewTask, Task};

    const ALL_OPERATIONS: [Operation; 11] = [
        Operation::ListEmployees,
        Operation::ViewEmployee,
        Operation::CreateTask,
        Operation::ViewTask,
        Operation::UpdateTaskStatus,
        Operation::LogTime,
        Operation::ViewTaskTimeLogs,
        Operation::ViewEmployeeTimeLogs,
        Operation::CreateProject,
        Operation::ReassignTaskProject,
        Operation::ListTasksWithoutProject,
    ];

    #[test]
    fn manager_is_allowed_everything_regardless_of_owner() {
        let manager = Caller::new(2, Role::Manager);
        for operation in ALL_OPERATIONS {
            for owner in [None, Some(1), Some(2), Some(99)] {
                assert_eq!(
                    authorize(&manager, operation, owner),
                    Decision::Allow,
                    "{}",
                    operation.as_str()
                );
            }
        }
    }

    #[test]
    fn employee_is_denied_manager_only_operations_even_on_own_records() {
        let employee = Caller::new(1, Role::Employee);
        for operation in [
            Operation::ListEmployees,
            Operation::ViewEmployee,
            Operation::CreateTask,
            Operation::CreateProject,
            Operation::ReassignTaskProject,
            Operation::ListTasksWithoutProject,
        ] {
            assert_eq!(
                authorize(&employee, operation, Some(1)),
                Decision::Deny(DenyReason::ManagerRequired),
                "{}",
                operation.as_str()
            );
        }
    }

    #[test]
    fn employee_owner_operations_follow_ownership() {
        let employee = Caller::new(1, Role::Employee);
        for operation in [
            Operation::ViewTask,
            Operation::UpdateTaskStatus,
            Operation::LogTime,
            Operation::ViewTaskTimeLogs,
            Operation::ViewEmployeeTimeLogs,
        ] {
            assert!(authorize(&employee, operation, Some(1)).is_allowed());
            assert_eq!(
                authorize(&employee, operation, Some(3)),
                Decision::Deny(DenyReason::NotOwner)
            );
            assert_eq!(
                authorize(&employee, operation, None),
                Decision::Deny(DenyReason::NotOwner)
            );
        }
    }

    #[test]
    fn task_visibility_matches_assignment() {
        let task = Task::new(1, NewTask::new("t", "d", 5));
        assert!(can_see_task(&Caller::new(5, Role::Employee), &task));
        assert!(!can_see_task(&Caller::new(6, Role::Employee), &task));
        assert!(can_see_task(&Caller::new(6, Role::Manager), &task));
    }
}
