use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task priority as chosen by the user when scheduling a study session.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// Task lifecycle status. The expected progression is pending → in-progress →
/// completed, but any status may be set directly at any time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Pending,
    InProgress,
    Completed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pending => write!(f, "pending"),
            Status::InProgress => write!(f, "in-progress"),
            Status::Completed => write!(f, "completed"),
        }
    }
}

/// Represents a single study task.
///
/// Serialized field names match the on-disk schema (`userId`, `estimatedTime`,
/// ...), so existing `tasks.json` files remain readable.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned at creation, immutable.
    pub id: u64,
    /// Identifier of the owning user; a task belongs to exactly one user.
    pub user_id: String,
    /// The name or description of the task.
    pub name: String,
    /// Free-text subject or category label.
    pub category: String,
    pub priority: Priority,
    pub status: Status,
    /// Calendar date the task is scheduled for; independent of `created_at`.
    pub date: NaiveDate,
    /// Advisory wall-clock start (`HH:mm`), not validated against `end_time`.
    #[serde(default)]
    pub start_time: String,
    /// Advisory wall-clock end (`HH:mm`).
    #[serde(default)]
    pub end_time: String,
    /// Estimated duration in minutes.
    pub estimated_time: u32,
    /// Minutes actually spent; starts at 0 and accumulates via timer sessions.
    #[serde(default)]
    pub actual_time: u32,
    /// Timestamp when the task was created (RFC 3339), set once.
    pub created_at: String,
    /// Stamped when `status` first transitions to completed. Never cleared
    /// automatically under the default policy, even if the status later
    /// moves away from completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// Fields supplied when creating a task. `status` and `actual_time` are not
/// accepted here: new tasks always start pending with zero time logged.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub user_id: String,
    pub name: String,
    pub category: String,
    pub priority: Priority,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub estimated_time: u32,
}

/// Field-level partial update; `None` leaves the existing value untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub estimated_time: Option<u32>,
    pub actual_time: Option<u32>,
}

/// Account role. Admins see the cross-user overview; users see their own
/// dashboard only.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Login account. Credentials are plaintext-matched locally; this is a
/// per-profile convenience, not a security mechanism.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    pub role: Role,
    pub name: String,
}

/// Derived statistics over a set of tasks. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Percentage of tasks completed, 0 when there are no tasks.
    pub completion_rate: f64,
    /// Sum of estimated minutes.
    pub total_estimated_time: u64,
    /// Sum of actual minutes.
    pub total_actual_time: u64,
    /// Mean symmetric estimate accuracy over completed tasks with both times
    /// positive, 0 when that subset is empty.
    pub average_accuracy: f64,
}

/// Closed calendar-date interval, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
