//! Allocation calculator: derived figures from a task snapshot and the budget.
//! Pure and recomputed on demand; nothing here is stored.

use crate::task::Task;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Allocation {
    pub available_time: f64,
    pub total_allocated_time: f64,
    /// May be negative when overbooked.
    pub remaining_time: f64,
    pub is_overbooked: bool,
}

impl Allocation {
    pub fn compute(tasks: &[Task], available_time: f64) -> Self {
        let total_allocated_time: f64 = tasks.iter().map(|t| t.duration).sum();
        let remaining_time = available_time - total_allocated_time;
        Self {
            available_time,
            total_allocated_time,
            remaining_time,
            is_overbooked: remaining_time < 0.0,
        }
    }

    /// Share of the budget as a percentage. A budget of zero or less reports 0.
    pub fn percent_of(&self, hours: f64) -> f64 {
        if self.available_time <= 0.0 || !self.available_time.is_finite() {
            return 0.0;
        }
        hours / self.available_time * 100.0
    }

    pub fn task_percent(&self, task: &Task) -> f64 {
        self.percent_of(task.duration)
    }

    pub fn utilization(&self) -> f64 {
        self.percent_of(self.total_allocated_time)
    }

    /// Remaining hours, only when some of the budget is still free.
    pub fn unallocated(&self) -> Option<f64> {
        (self.remaining_time > 0.0).then_some(self.remaining_time)
    }

    /// Utilization clamped to 0..=100, for gauges.
    pub fn progress_percent(&self) -> f64 {
        self.utilization().clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;

    fn work_and_sleep() -> Vec<Task> {
        vec![
            Task::new(1, "Work", 8.0).with_priority(Priority::High),
            Task::new(2, "Sleep", 8.0),
        ]
    }

    #[test]
    fn work_and_sleep_leaves_eight_hours() {
        let a = Allocation::compute(&work_and_sleep(), 24.0);
        assert_eq!(a.total_allocated_time, 16.0);
        assert_eq!(a.remaining_time, 8.0);
        assert!(!a.is_overbooked);
        assert_eq!(a.unallocated(), Some(8.0));
        assert!((a.percent_of(8.0) - 33.333).abs() < 0.001);
    }

    #[test]
    fn overbooked_when_tasks_exceed_budget() {
        let tasks = vec![Task::new(1, "a", 20.0), Task::new(2, "b", 10.0)];
        let a = Allocation::compute(&tasks, 24.0);
        assert_eq!(a.remaining_time, -6.0);
        assert!(a.is_overbooked);
        assert_eq!(a.unallocated(), None);
        assert_eq!(a.progress_percent(), 100.0);
    }

    #[test]
    fn exact_fit_is_neither_overbooked_nor_unallocated() {
        let tasks = vec![Task::new(1, "a", 24.0)];
        let a = Allocation::compute(&tasks, 24.0);
        assert!(!a.is_overbooked);
        assert_eq!(a.unallocated(), None);
        assert_eq!(a.utilization(), 100.0);
    }

    #[test]
    fn zero_budget_reports_zero_percent() {
        let a = Allocation::compute(&work_and_sleep(), 0.0);
        assert_eq!(a.utilization(), 0.0);
        assert_eq!(a.percent_of(8.0), 0.0);
        assert!(a.is_overbooked);
    }

    #[test]
    fn empty_list_leaves_full_budget() {
        let a = Allocation::compute(&[], 24.0);
        assert_eq!(a.total_allocated_time, 0.0);
        assert_eq!(a.unallocated(), Some(24.0));
    }
}
