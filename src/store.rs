use chrono::Local;
use crate::models::{NewTask, Status, Task, TaskUpdate};
use crate::storage;

/// What happens to `completed_at` when a task's status moves *away* from
/// completed.
///
/// The historical behavior is `Retain`: the stamp survives a regression to
/// pending or in-progress, so a reverted task keeps a stale completion time.
/// `ClearOnRegress` is the corrected policy for callers that want the stamp
/// to track the current status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletedAtPolicy {
    #[default]
    Retain,
    ClearOnRegress,
}

/// The authoritative in-session task collection.
///
/// Every mutation rewrites the whole collection to storage: one mutation,
/// one persisted snapshot. Persistence failures are returned to the caller
/// instead of being swallowed, so the UI can warn the user.
pub struct TaskStore {
    tasks: Vec<Task>,
    policy: CompletedAtPolicy,
}

impl TaskStore {
    /// Loads the store from disk with the default `completed_at` policy.
    pub fn load() -> TaskStore {
        TaskStore::with_policy(CompletedAtPolicy::default())
    }

    pub fn with_policy(policy: CompletedAtPolicy) -> TaskStore {
        TaskStore {
            tasks: storage::load_tasks(),
            policy,
        }
    }

    /// All tasks, in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// All tasks owned by `user_id`, in insertion order.
    pub fn user_tasks(&self, user_id: &str) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.user_id == user_id).collect()
    }

    /// Appends a new task and returns its id.
    ///
    /// The task always starts pending with zero actual time, whatever the
    /// form said; `created_at` is stamped with the current time.
    pub fn add_task(&mut self, new: NewTask) -> std::io::Result<u64> {
        let id = self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        self.tasks.push(Task {
            id,
            user_id: new.user_id,
            name: new.name,
            category: new.category,
            priority: new.priority,
            status: Status::Pending,
            date: new.date,
            start_time: new.start_time,
            end_time: new.end_time,
            estimated_time: new.estimated_time,
            actual_time: 0,
            created_at: Local::now().to_rfc3339(),
            completed_at: None,
        });
        self.persist()?;
        Ok(id)
    }

    /// Merges the given fields into the task matching `id`.
    ///
    /// Returns `Ok(false)` without touching anything if the id is unknown.
    /// Setting status to completed from a non-completed status stamps
    /// `completed_at`; re-completing an already-completed task does not.
    pub fn update_task(&mut self, id: u64, update: TaskUpdate) -> std::io::Result<bool> {
        let policy = self.policy;
        let task = match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(t) => t,
            None => return Ok(false),
        };
        let previous = task.status;
        if let Some(name) = update.name {
            task.name = name;
        }
        if let Some(category) = update.category {
            task.category = category;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(status) = update.status {
            task.status = status;
        }
        if let Some(date) = update.date {
            task.date = date;
        }
        if let Some(start) = update.start_time {
            task.start_time = start;
        }
        if let Some(end) = update.end_time {
            task.end_time = end;
        }
        if let Some(est) = update.estimated_time {
            task.estimated_time = est;
        }
        if let Some(actual) = update.actual_time {
            task.actual_time = actual;
        }
        stamp_completed_at(task, previous, policy);
        self.persist()?;
        Ok(true)
    }

    /// Removes the task with matching `id`; `Ok(false)` if not found.
    pub fn delete_task(&mut self, id: u64) -> std::io::Result<bool> {
        let len_before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == len_before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> std::io::Result<()> {
        storage::save_tasks(&self.tasks)
    }
}

/// One place owns the `completed_at` transition rule so the policy can be
/// swapped without touching the field merge.
fn stamp_completed_at(task: &mut Task, previous: Status, policy: CompletedAtPolicy) {
    if task.status == Status::Completed {
        if previous != Status::Completed {
            task.completed_at = Some(Local::now().to_rfc3339());
        }
    } else if policy == CompletedAtPolicy::ClearOnRegress {
        task.completed_at = None;
    }
}
