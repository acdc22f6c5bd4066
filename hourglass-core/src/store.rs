//! TaskStore: in-memory, insertion-ordered task list plus the budget.
//!
//! - Order is insertion order and is display-significant.
//! - Ids come from a monotonic counter and are never reused.
//! - Overbooking is allowed; nothing here caps the sum of durations.

use crate::allocation::Allocation;
use crate::task::{Budget, NewTask, Task, TaskId, TaskPatch, TimeFrame, DURATION_STEP};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskError {
    #[error("task name must not be empty")]
    EmptyName,

    #[error("duration must be at least 0.25 hours in steps of 0.25 (got {0})")]
    InvalidDuration(f64),

    #[error("no task with id {0}")]
    UnknownTask(TaskId),

    #[error("available time must be a non-negative number of hours (got {0})")]
    InvalidAvailableTime(f64),
}

pub fn validate_name(name: &str) -> Result<String, TaskError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyName);
    }
    Ok(trimmed.to_string())
}

pub fn validate_duration(hours: f64) -> Result<f64, TaskError> {
    if !hours.is_finite() || hours < DURATION_STEP {
        return Err(TaskError::InvalidDuration(hours));
    }
    let steps = hours / DURATION_STEP;
    if (steps - steps.round()).abs() > 1e-9 {
        return Err(TaskError::InvalidDuration(hours));
    }
    Ok(hours)
}

#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    budget: Budget,
    next_id: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::with_budget(Budget::default())
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_budget(budget: Budget) -> Self {
        Self {
            tasks: Vec::new(),
            budget,
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn allocation(&self) -> Allocation {
        Allocation::compute(&self.tasks, self.budget.available_time)
    }

    pub fn add_task(&mut self, input: NewTask) -> Result<TaskId, TaskError> {
        let name = validate_name(&input.name)?;
        let duration = validate_duration(input.duration)?;

        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            name,
            duration,
            priority: input.priority,
        });
        Ok(id)
    }

    pub fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(pos))
    }

    /// Apply a partial update in place. All fields are validated before any is written.
    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> Result<&Task, TaskError> {
        let name = patch.name.as_deref().map(validate_name).transpose()?;
        let duration = patch.duration.map(validate_duration).transpose()?;

        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::UnknownTask(id))?;

        if let Some(name) = name {
            task.name = name;
        }
        if let Some(duration) = duration {
            task.duration = duration;
        }
        if let Some(priority) = patch.priority {
            task.priority = Some(priority);
        }
        Ok(task)
    }

    pub fn set_time_frame(&mut self, time_frame: TimeFrame) {
        self.budget.time_frame = time_frame;
    }

    pub fn set_available_time(&mut self, hours: f64) -> Result<(), TaskError> {
        if !hours.is_finite() || hours < 0.0 {
            return Err(TaskError::InvalidAvailableTime(hours));
        }
        self.budget.available_time = hours;
        Ok(())
    }
}
