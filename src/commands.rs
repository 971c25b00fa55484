use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use chrono::{Local, NaiveDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use crate::auth;
use crate::export::tasks_to_csv;
use crate::models::{DateRange, NewTask, Priority, Role, Status, Task, TaskUpdate, User};
use crate::query::{filter_tasks, task_stats, DateFilter, TaskFilter};
use crate::storage::{delete_database, load_users};
use crate::store::TaskStore;

/// Logs in with the given credentials and persists the session.
pub fn cmd_login(username: String, password: String, silent: bool) {
    match auth::login(&username, &password) {
        Some(user) => {
            if !silent { println!("Logged in as {} ({}).", user.name, user.username); }
        }
        None => {
            if !silent { eprintln!("Invalid username or password."); }
        }
    }
}

/// Logs out the current user.
pub fn cmd_logout(silent: bool) {
    if let Err(e) = auth::logout() {
        if !silent { eprintln!("Failed to clear session: {}", e); }
    } else if !silent {
        println!("Logged out.");
    }
}

/// Prints the logged-in user, if any.
pub fn cmd_whoami() {
    match auth::current_user() {
        Some(user) => println!("{} ({}, {:?})", user.name, user.username, user.role),
        None => println!("Not logged in."),
    }
}

/// Adds a new task for `user`.
///
/// Status and actual time are not accepted: new tasks start pending with
/// zero minutes logged.
pub fn cmd_add(
    store: &mut TaskStore,
    user: &User,
    name: String,
    category: String,
    priority: Priority,
    date: String,
    start: Option<String>,
    end: Option<String>,
    estimate: Option<u32>,
    silent: bool,
) {
    let date = match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
        Ok(d) => d,
        Err(e) => {
            if !silent { eprintln!("Invalid date '{}': {}. Use YYYY-MM-DD.", date, e); }
            return;
        }
    };

    let new = NewTask {
        user_id: user.id.clone(),
        name,
        category,
        priority,
        date,
        start_time: start.unwrap_or_default(),
        end_time: end.unwrap_or_default(),
        estimated_time: estimate.unwrap_or(30),
    };
    match store.add_task(new) {
        Ok(id) => {
            if !silent { println!("Task added (id = {})", id); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
}

/// Edits an existing task's details.
pub fn cmd_edit(
    store: &mut TaskStore,
    id: u64,
    name: Option<String>,
    category: Option<String>,
    priority: Option<Priority>,
    date: Option<String>,
    start: Option<String>,
    end: Option<String>,
    estimate: Option<u32>,
    actual: Option<u32>,
    silent: bool,
) {
    let date = match date {
        Some(d) => match NaiveDate::parse_from_str(&d, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(e) => {
                if !silent { eprintln!("Invalid date '{}': {}. Use YYYY-MM-DD.", d, e); }
                return;
            }
        },
        None => None,
    };

    let update = TaskUpdate {
        name,
        category,
        priority,
        status: None,
        date,
        start_time: start,
        end_time: end,
        estimated_time: estimate,
        actual_time: actual,
    };
    match store.update_task(id, update) {
        Ok(true) => {
            if !silent { println!("Task {} updated.", id); }
        }
        Ok(false) => {
            if !silent { eprintln!("Task {} not found.", id); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
}

/// Sets a task's status.
///
/// Moving to completed for the first time stamps the completion time.
pub fn cmd_status(store: &mut TaskStore, id: u64, status: Status, silent: bool) {
    let update = TaskUpdate { status: Some(status), ..TaskUpdate::default() };
    match store.update_task(id, update) {
        Ok(true) => {
            if !silent { println!("Task {} is now {}.", id, status); }
        }
        Ok(false) => {
            if !silent { eprintln!("Task {} not found.", id); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
}

/// Logs minutes worked on a task.
///
/// actual_time += minutes
pub fn cmd_log(store: &mut TaskStore, id: u64, minutes: u32, silent: bool) {
    let current = match store.get(id) {
        Some(t) => t.actual_time,
        None => {
            if !silent { eprintln!("Task {} not found.", id); }
            return;
        }
    };
    let update = TaskUpdate {
        actual_time: Some(current + minutes),
        ..TaskUpdate::default()
    };
    match store.update_task(id, update) {
        Ok(_) => {
            if !silent { println!("Logged {} min on task {} ({} min total).", minutes, id, current + minutes); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
}

/// Removes a task by ID.
pub fn cmd_remove(store: &mut TaskStore, id: u64, silent: bool) {
    match store.delete_task(id) {
        Ok(true) => {
            if !silent { println!("Task {} removed.", id); }
        }
        Ok(false) => {
            if !silent { eprintln!("Task {} not found.", id); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
}

/// Lists tasks in a formatted table, in insertion order.
///
/// Filters are ANDed; admins may pass `all_users` to list everyone's tasks.
pub fn cmd_list(
    store: &TaskStore,
    user: &User,
    search: Option<String>,
    status: Option<Status>,
    priority: Option<Priority>,
    category: Option<String>,
    date: DateFilter,
    all_users: bool,
) {
    if all_users && user.role != Role::Admin {
        eprintln!("--all-users requires an admin session.");
        return;
    }

    let scoped: Vec<&Task> = if all_users {
        store.tasks().iter().collect()
    } else {
        store.user_tasks(&user.id)
    };

    let filter = TaskFilter {
        search: search.unwrap_or_default(),
        status,
        priority,
        category,
        date,
    };
    let today = Local::now().date_naive();
    let tasks = filter_tasks(&scoped, &filter, today);

    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut header = vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Name").add_attribute(Attribute::Bold),
        Cell::new("Category").add_attribute(Attribute::Bold),
        Cell::new("Priority").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
        Cell::new("Date").add_attribute(Attribute::Bold),
        Cell::new("Time").add_attribute(Attribute::Bold),
        Cell::new("Est (m)").add_attribute(Attribute::Bold),
        Cell::new("Actual (m)").add_attribute(Attribute::Bold),
    ];
    if all_users {
        header.insert(1, Cell::new("User").add_attribute(Attribute::Bold));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for t in tasks {
        let time = if t.start_time.is_empty() && t.end_time.is_empty() {
            String::new()
        } else {
            format!("{}-{}", t.start_time, t.end_time)
        };
        let mut row = vec![
            Cell::new(t.id),
            Cell::new(&t.name),
            Cell::new(&t.category),
            Cell::new(t.priority.to_string()).fg(priority_color(t.priority)),
            Cell::new(t.status.to_string()).fg(status_color(t.status)),
            Cell::new(t.date),
            Cell::new(time),
            Cell::new(t.estimated_time),
            Cell::new(t.actual_time),
        ];
        if all_users {
            row.insert(1, Cell::new(&t.user_id));
        }
        table.add_row(row);
    }

    println!("{table}");
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Pending => Color::Yellow,
        Status::InProgress => Color::Blue,
        Status::Completed => Color::Green,
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

/// Parses `--from`/`--to` into a date range; both or neither must be given.
fn parse_range(from: Option<String>, to: Option<String>) -> Result<Option<DateRange>, String> {
    match (from, to) {
        (None, None) => Ok(None),
        (Some(from), Some(to)) => {
            let start = NaiveDate::parse_from_str(&from, "%Y-%m-%d")
                .map_err(|e| format!("Invalid date '{}': {}. Use YYYY-MM-DD.", from, e))?;
            let end = NaiveDate::parse_from_str(&to, "%Y-%m-%d")
                .map_err(|e| format!("Invalid date '{}': {}. Use YYYY-MM-DD.", to, e))?;
            Ok(Some(DateRange { start, end }))
        }
        _ => Err("--from and --to must be given together.".into()),
    }
}

/// Prints completion and time-usage statistics for `user`.
pub fn cmd_stats(store: &TaskStore, user: &User, from: Option<String>, to: Option<String>) {
    let range = match parse_range(from, to) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };

    let tasks = store.user_tasks(&user.id);
    let stats = task_stats(&tasks, range.as_ref());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec!["Total tasks".to_string(), stats.total_tasks.to_string()]);
    table.add_row(vec!["Completed".to_string(), stats.completed_tasks.to_string()]);
    table.add_row(vec!["Completion rate".to_string(), format!("{:.1}%", stats.completion_rate)]);
    table.add_row(vec!["Estimated time".to_string(), format!("{} min", stats.total_estimated_time)]);
    table.add_row(vec!["Actual time".to_string(), format!("{} min", stats.total_actual_time)]);
    table.add_row(vec!["Avg accuracy".to_string(), format!("{:.1}%", stats.average_accuracy)]);
    println!("{table}");
}

/// Admin overview: one statistics row per user, plus totals.
///
/// Totals follow the dashboard's definitions: task counts are summed, study
/// hours are total actual minutes / 60, and the overall completion rate is
/// the mean of the per-user rates.
pub fn cmd_overview(store: &TaskStore, user: &User, from: Option<String>, to: Option<String>) {
    if user.role != Role::Admin {
        eprintln!("The overview requires an admin session.");
        return;
    }
    let range = match parse_range(from, to) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };

    let users: Vec<User> = load_users().into_iter().filter(|u| u.role == Role::User).collect();
    if users.is_empty() {
        println!("No users found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("User").add_attribute(Attribute::Bold),
            Cell::new("Tasks").add_attribute(Attribute::Bold),
            Cell::new("Completed").add_attribute(Attribute::Bold),
            Cell::new("Rate").add_attribute(Attribute::Bold),
            Cell::new("Study Hours").add_attribute(Attribute::Bold),
            Cell::new("Accuracy").add_attribute(Attribute::Bold),
        ]);

    let mut total_tasks = 0usize;
    let mut total_completed = 0usize;
    let mut total_actual = 0u64;
    let mut rate_sum = 0.0;
    for u in &users {
        let tasks = store.user_tasks(&u.id);
        let stats = task_stats(&tasks, range.as_ref());
        total_tasks += stats.total_tasks;
        total_completed += stats.completed_tasks;
        total_actual += stats.total_actual_time;
        rate_sum += stats.completion_rate;
        table.add_row(vec![
            u.name.clone(),
            stats.total_tasks.to_string(),
            stats.completed_tasks.to_string(),
            format!("{:.1}%", stats.completion_rate),
            format!("{:.1}", stats.total_actual_time as f64 / 60.0),
            format!("{:.1}%", stats.average_accuracy),
        ]);
    }
    table.add_row(vec![
        Cell::new("All users").add_attribute(Attribute::Bold),
        Cell::new(total_tasks),
        Cell::new(total_completed),
        Cell::new(format!("{:.1}%", rate_sum / users.len() as f64)),
        Cell::new(format!("{:.1}", total_actual as f64 / 60.0)),
        Cell::new(""),
    ]);
    println!("{table}");
}

/// Writes the current user's tasks as CSV.
///
/// Defaults to `tasks_<username>_<date>.csv` in the current directory.
pub fn cmd_export(store: &TaskStore, user: &User, output: Option<PathBuf>, silent: bool) {
    let tasks = store.user_tasks(&user.id);
    let csv = tasks_to_csv(&tasks);
    let path = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "tasks_{}_{}.csv",
            user.username,
            Local::now().date_naive()
        ))
    });
    match fs::write(&path, csv) {
        Ok(()) => {
            if !silent { println!("Exported {} tasks to {}.", tasks.len(), path.display()); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to write {}: {}", path.display(), e); }
        }
    }
}

/// Resets the database by deleting all tasks, users, and the session.
pub fn cmd_reset(force: bool) {
    if !force {
        print!("Are you sure you want to delete all tasks and users? This cannot be undone. [y/N] ");
        let _ = io::stdout().flush();
        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            println!("Aborted.");
            return;
        }
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = delete_database() {
        eprintln!("Failed to reset database: {}", e);
    } else {
        println!("Database reset successfully.");
    }
}
