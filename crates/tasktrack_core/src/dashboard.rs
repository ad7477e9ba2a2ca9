//! Dashboard statistics over a task set and a time-log set.

use crate::model::task::{Task, TaskPriority, TaskStatus, TimeLog};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub in_progress_tasks: usize,
    /// Rounded to 2 decimal places.
    pub total_hours: f64,
    /// Percentage of completed tasks, rounded to 1 decimal place; 0 when
    /// there are no tasks.
    pub completion_rate: f64,
    pub priority_breakdown: PriorityBreakdown,
}

/// Reduces `tasks` and `logs` into dashboard statistics.
///
/// The log set is passed separately because the employee view counts the
/// employee's own entries rather than every entry on their tasks.
pub fn aggregate<'a>(
    tasks: &[Task],
    logs: impl IntoIterator<Item = &'a TimeLog>,
) -> DashboardStats {
    let mut stats = DashboardStats {
        total_tasks: tasks.len(),
        ..DashboardStats::default()
    };

    for task in tasks {
        match task.status {
            TaskStatus::Completed => stats.completed_tasks += 1,
            TaskStatus::Pending => stats.pending_tasks += 1,
            TaskStatus::InProgress => stats.in_progress_tasks += 1,
        }
        match task.priority {
            TaskPriority::High => stats.priority_breakdown.high += 1,
            TaskPriority::Medium => stats.priority_breakdown.medium += 1,
            TaskPriority::Low => stats.priority_breakdown.low += 1,
        }
    }

    let hours: f64 = logs.into_iter().map(|log| log.hours).sum();
    stats.total_hours = round_to(hours, 2);
    stats.completion_rate = if stats.total_tasks == 0 {
        0.0
    } else {
        round_to(
            stats.completed_tasks as f64 / stats.total_tasks as f64 * 100.0,
            1,
        )
    };

    stats
}

/// Rounds to `decimals` places with exact halves going to the even digit.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::{aggregate, round_to, DashboardStats};
    use crate::model::task::{NewTask, Task, TaskPriority, TaskStatus, TimeLog};

    fn task(id: i64, status: TaskStatus, priority: TaskPriority) -> Task {
        let mut request = NewTask::new(format!("task {id}"), "", 1);
        request.priority = priority;
        let mut task = Task::new(id, request);
        task.status = status;
        task
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let stats = aggregate(&[], std::iter::empty());
        assert_eq!(stats, DashboardStats::default());
        assert_eq!(stats.completion_rate, 0.0);
    }

    #[test]
    fn counts_statuses_and_priorities() {
        let tasks = vec![
            task(1, TaskStatus::Completed, TaskPriority::High),
            task(2, TaskStatus::Pending, TaskPriority::Medium),
            task(3, TaskStatus::InProgress, TaskPriority::Medium),
        ];
        let stats = aggregate(&tasks, std::iter::empty());

        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.pending_tasks, 1);
        assert_eq!(stats.in_progress_tasks, 1);
        assert_eq!(stats.completion_rate, 33.3);
        assert_eq!(stats.priority_breakdown.high, 1);
        assert_eq!(stats.priority_breakdown.medium, 2);
        assert_eq!(stats.priority_breakdown.low, 0);
    }

    #[test]
    fn hours_are_summed_from_the_log_set_and_rounded() {
        let logs = [
            TimeLog::new(1, 1.005, ""),
            TimeLog::new(1, 2.111, ""),
            TimeLog::new(2, 0.5, ""),
        ];
        let stats = aggregate(&[], logs.iter());
        assert_eq!(stats.total_hours, 3.62);
    }

    #[test]
    fn rounding_helper_keeps_requested_precision() {
        assert_eq!(round_to(66.666_666, 1), 66.7);
        assert_eq!(round_to(4.0, 2), 4.0);
    }

    #[test]
    fn exact_halves_round_to_even() {
        let mut tasks = vec![task(1, TaskStatus::Completed, TaskPriority::Medium)];
        tasks.extend((2..=16).map(|id| task(id, TaskStatus::Pending, TaskPriority::Medium)));
        let logs = [TimeLog::new(1, 0.125, "")];

        let stats = aggregate(&tasks, logs.iter());
        assert_eq!(stats.completion_rate, 6.2);
        assert_eq!(stats.total_hours, 0.12);

        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(12.5, 0), 12.0);
    }
}
