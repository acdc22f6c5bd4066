//! Task and budget model for the time-budgeting engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest duration step a task may carry, in hours.
pub const DURATION_STEP: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(TaskId)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "h" => Ok(Priority::High),
            "medium" | "med" | "m" => Ok(Priority::Medium),
            "low" | "l" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{other}' (expected high, medium or low)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    #[default]
    Daily,
    Weekly,
}

impl TimeFrame {
    pub fn label(self) -> &'static str {
        match self {
            TimeFrame::Daily => "Daily",
            TimeFrame::Weekly => "Weekly",
        }
    }

    /// Hours in one period. Informational only; never applied to the budget.
    pub fn nominal_hours(self) -> u32 {
        match self {
            TimeFrame::Daily => 24,
            TimeFrame::Weekly => 168,
        }
    }

    pub fn adjective(self) -> &'static str {
        match self {
            TimeFrame::Daily => "daily",
            TimeFrame::Weekly => "weekly",
        }
    }
}

impl FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" | "d" => Ok(TimeFrame::Daily),
            "weekly" | "week" | "w" => Ok(TimeFrame::Weekly),
            other => Err(format!("unknown time frame '{other}' (expected daily or weekly)")),
        }
    }
}

/// The user's total time budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub time_frame: TimeFrame,
    /// Hours.
    pub available_time: f64,
}

impl Budget {
    pub fn new(time_frame: TimeFrame, available_time: f64) -> Self {
        Self {
            time_frame,
            available_time,
        }
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::new(TimeFrame::Daily, 24.0)
    }
}

/// A named block of hours allocated against the budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,

    /// Hours, in steps of [`DURATION_STEP`].
    pub duration: f64,

    pub priority: Option<Priority>,
}

impl Task {
    pub fn new(id: u64, name: impl Into<String>, duration: f64) -> Self {
        Self {
            id: TaskId(id),
            name: name.into(),
            duration,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_duration(mut self, hours: f64) -> Self {
        self.duration = hours;
        self
    }
}

/// Input for creating a task through the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub name: String,
    pub duration: f64,
    pub priority: Option<Priority>,
}

impl NewTask {
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
            priority: Some(Priority::default()),
        }
    }

    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub duration: Option<f64>,
    pub priority: Option<Priority>,
}

impl TaskPatch {
    pub fn duration(hours: f64) -> Self {
        Self {
            duration: Some(hours),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_short_and_long_forms() {
        assert_eq!("High".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("m".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!(" low ".parse::<Priority>().unwrap(), Priority::Low);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn time_frame_labels() {
        assert_eq!(TimeFrame::Daily.label(), "Daily");
        assert_eq!(TimeFrame::Weekly.nominal_hours(), 168);
        assert_eq!("weekly".parse::<TimeFrame>().unwrap(), TimeFrame::Weekly);
    }

    #[test]
    fn task_id_accepts_hash_prefix() {
        assert_eq!("#12".parse::<TaskId>().unwrap(), TaskId(12));
        assert_eq!(TaskId(3).to_string(), "3");
    }
}
