use std::time::Instant;
use chrono::{Local, NaiveDate};
use ratatui::widgets::TableState;
use crate::models::{NewTask, Priority, Status, Task, TaskStats, TaskUpdate, User};
use crate::query::{filter_tasks, task_stats, DateFilter, TaskFilter};
use crate::store::TaskStore;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
    Searching,
}

pub enum InputField {
    None,
    Name,
    Category,
    Date,
    Estimate,
    LogMinutes,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub name: String,
    pub category: String,
    pub date: String,
    pub estimate: Option<u32>,
    pub step: usize, // 0: Name, 1: Category, 2: Date, 3: Estimate, 4: Priority
}

/// A running stopwatch bound to one task.
///
/// Lives only while the timer runs; pausing, stopping, or quitting the UI
/// commits the elapsed whole minutes and drops the session, so no tick can
/// outlive the dashboard and mutate a discarded task.
pub struct TimerSession {
    pub task_id: u64,
    pub started_at: Instant,
    /// Minutes already on the task when the session started.
    pub base_minutes: u32,
}

impl TimerSession {
    pub fn elapsed_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Total seconds on the task including previously committed minutes.
    pub fn total_secs(&self) -> u64 {
        u64::from(self.base_minutes) * 60 + self.elapsed_secs()
    }
}

pub struct App {
    pub store: TaskStore,
    pub user: User,
    /// Current filtered view of the user's tasks, insertion order.
    pub tasks: Vec<Task>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<u64>,
    pub add_state: AddState,
    pub filter: TaskFilter,
    pub show_stats: bool,
    pub timer: Option<TimerSession>,
    /// Last recoverable problem (bad input, failed save), shown in the UI.
    pub warning: Option<String>,
}

impl App {
    pub fn new(store: TaskStore, user: User) -> App {
        let mut app = App {
            store,
            user,
            tasks: Vec::new(),
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            add_state: AddState::default(),
            filter: TaskFilter::default(),
            show_stats: false,
            timer: None,
            warning: None,
        };
        app.reload();
        app
    }

    /// Recomputes the filtered view and clamps the selection.
    pub fn reload(&mut self) {
        let today = Local::now().date_naive();
        let user_tasks = self.store.user_tasks(&self.user.id);
        self.tasks = filter_tasks(&user_tasks, &self.filter, today)
            .into_iter()
            .cloned()
            .collect();

        if self.tasks.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.tasks.len() {
                self.state.select(Some(self.tasks.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Selects the next task, wrapping around.
    pub fn next(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.tasks.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous task, wrapping around.
    pub fn previous(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.tasks.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.state.selected().and_then(|i| self.tasks.get(i)).map(|t| t.id)
    }

    fn apply_update(&mut self, id: u64, update: TaskUpdate) {
        match self.store.update_task(id, update) {
            Ok(true) => {}
            Ok(false) => self.warning = Some(format!("Task {} not found.", id)),
            Err(e) => self.warning = Some(format!("Failed to save tasks: {}", e)),
        }
        self.reload();
    }

    /// Advances the selected task's status one step, wrapping back to
    /// pending after completed.
    pub fn cycle_status_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            let next = match self.store.get(id).map(|t| t.status) {
                Some(Status::Pending) => Status::InProgress,
                Some(Status::InProgress) => Status::Completed,
                Some(Status::Completed) => Status::Pending,
                None => return,
            };
            self.apply_update(id, TaskUpdate { status: Some(next), ..TaskUpdate::default() });
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            // Drop a running timer for the task being removed.
            if self.timer.as_ref().is_some_and(|s| s.task_id == id) {
                self.timer = None;
            }
            match self.store.delete_task(id) {
                Ok(_) => {}
                Err(e) => self.warning = Some(format!("Failed to save tasks: {}", e)),
            }
            self.reload();
        }
    }

    /// Statistics over all of the user's tasks, ignoring the view filter.
    pub fn stats(&self) -> TaskStats {
        task_stats(&self.store.user_tasks(&self.user.id), None)
    }

    pub fn cycle_status_filter(&mut self) {
        self.filter.status = match self.filter.status {
            None => Some(Status::Pending),
            Some(Status::Pending) => Some(Status::InProgress),
            Some(Status::InProgress) => Some(Status::Completed),
            Some(Status::Completed) => None,
        };
        self.reload();
    }

    pub fn cycle_priority_filter(&mut self) {
        self.filter.priority = match self.filter.priority {
            None => Some(Priority::High),
            Some(Priority::High) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::Low),
            Some(Priority::Low) => None,
        };
        self.reload();
    }

    pub fn cycle_date_filter(&mut self) {
        self.filter.date = match self.filter.date {
            DateFilter::All => DateFilter::Today,
            DateFilter::Today => DateFilter::ThisWeek,
            DateFilter::ThisWeek => DateFilter::ThisMonth,
            DateFilter::ThisMonth => DateFilter::All,
        };
        self.reload();
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Initiates editing of a specific field for the selected task.
    pub fn start_edit(&mut self, field: InputField) {
        if let Some(i) = self.state.selected() {
            if let Some(t) = self.tasks.get(i) {
                self.target_id = Some(t.id);
                self.input_field = field;
                self.input_mode = InputMode::Editing;

                // Pre-fill buffer for editing
                self.input_buffer = match self.input_field {
                    InputField::Name => t.name.clone(),
                    InputField::Category => t.category.clone(),
                    InputField::Date => t.date.to_string(),
                    InputField::Estimate => t.estimated_time.to_string(),
                    InputField::LogMinutes => String::new(),
                    InputField::None => String::new(),
                };
            }
        }
    }

    /// Enters live search mode; typed characters narrow the list directly.
    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Searching;
    }

    pub fn search_push(&mut self, c: char) {
        self.filter.search.push(c);
        self.reload();
    }

    pub fn search_pop(&mut self) {
        self.filter.search.pop();
        self.reload();
    }

    /// Handles Enter based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Editing => self.handle_editing_input(),
            _ => {}
        }
    }

    fn handle_adding_input(&mut self) {
        match self.add_state.step {
            0 => {
                // Name
                if !self.input_buffer.is_empty() {
                    self.add_state.name = self.input_buffer.clone();
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            1 => {
                // Category
                if !self.input_buffer.is_empty() {
                    self.add_state.category = self.input_buffer.clone();
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            2 => {
                // Date
                if NaiveDate::parse_from_str(&self.input_buffer, "%Y-%m-%d").is_ok() {
                    self.add_state.date = self.input_buffer.clone();
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                } else {
                    self.warning = Some(format!("Invalid date '{}'. Use YYYY-MM-DD.", self.input_buffer));
                }
            }
            3 => {
                // Estimate
                if let Ok(m) = self.input_buffer.parse::<u32>() {
                    self.add_state.estimate = Some(m);
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                } else if self.input_buffer.is_empty() {
                    self.add_state.step += 1;
                }
            }
            4 => {
                // Priority
                let priority = match self.input_buffer.to_lowercase().as_str() {
                    "high" | "h" => Priority::High,
                    "low" | "l" => Priority::Low,
                    _ => Priority::Medium,
                };
                let date = match NaiveDate::parse_from_str(&self.add_state.date, "%Y-%m-%d") {
                    Ok(d) => d,
                    Err(_) => Local::now().date_naive(),
                };
                let new = NewTask {
                    user_id: self.user.id.clone(),
                    name: self.add_state.name.clone(),
                    category: self.add_state.category.clone(),
                    priority,
                    date,
                    start_time: String::new(),
                    end_time: String::new(),
                    estimated_time: self.add_state.estimate.unwrap_or(30),
                };
                if let Err(e) = self.store.add_task(new) {
                    self.warning = Some(format!("Failed to save tasks: {}", e));
                }
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.reload();
            }
            _ => {}
        }
    }

    fn handle_editing_input(&mut self) {
        let Some(id) = self.target_id else { return };
        let buffer = self.input_buffer.clone();
        match self.input_field {
            InputField::Name => {
                self.apply_update(id, TaskUpdate { name: Some(buffer), ..TaskUpdate::default() });
            }
            InputField::Category => {
                self.apply_update(id, TaskUpdate { category: Some(buffer), ..TaskUpdate::default() });
            }
            InputField::Date => match NaiveDate::parse_from_str(&buffer, "%Y-%m-%d") {
                Ok(d) => {
                    self.apply_update(id, TaskUpdate { date: Some(d), ..TaskUpdate::default() });
                }
                Err(_) => {
                    self.warning = Some(format!("Invalid date '{}'. Use YYYY-MM-DD.", buffer));
                }
            },
            InputField::Estimate => {
                if let Ok(m) = buffer.parse::<u32>() {
                    self.apply_update(id, TaskUpdate { estimated_time: Some(m), ..TaskUpdate::default() });
                }
            }
            InputField::LogMinutes => {
                if let Ok(m) = buffer.parse::<u32>() {
                    let current = self.store.get(id).map(|t| t.actual_time).unwrap_or(0);
                    self.apply_update(id, TaskUpdate { actual_time: Some(current + m), ..TaskUpdate::default() });
                }
            }
            InputField::None => {}
        }
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Starts the timer on the selected task, or pauses a running one.
    ///
    /// Starting on a pending task moves it to in-progress; pausing commits
    /// the accumulated whole minutes and cancels the session.
    pub fn timer_toggle(&mut self) {
        if self.timer.is_some() {
            self.commit_timer(false);
            return;
        }
        let Some(id) = self.selected_id() else { return };
        let Some(task) = self.store.get(id) else { return };
        let base_minutes = task.actual_time;
        if task.status == Status::Pending {
            self.apply_update(id, TaskUpdate { status: Some(Status::InProgress), ..TaskUpdate::default() });
        }
        self.timer = Some(TimerSession {
            task_id: id,
            started_at: Instant::now(),
            base_minutes,
        });
    }

    /// Stops a running timer: commits the minutes and completes the task.
    pub fn timer_stop(&mut self) {
        if self.timer.is_some() {
            self.commit_timer(true);
        }
    }

    /// Called on quit so a running session is committed, never leaked.
    pub fn shutdown(&mut self) {
        if self.timer.is_some() {
            self.commit_timer(false);
        }
    }

    fn commit_timer(&mut self, complete: bool) {
        let Some(session) = self.timer.take() else { return };
        let minutes = (session.total_secs() / 60) as u32;
        let update = TaskUpdate {
            actual_time: Some(minutes),
            status: complete.then_some(Status::Completed),
            ..TaskUpdate::default()
        };
        self.apply_update(session.task_id, update);
    }
}
