use chrono::{Datelike, Duration, NaiveDate};
use clap::ValueEnum;
use std::fmt;
use crate::models::{DateRange, Priority, Status, Task, TaskStats};

/// Symmetric estimate accuracy for one task, in percent.
///
/// `min(est/act, act/est) * 100`: a naive `est/act` ratio would reward wild
/// over-estimation, so overshoot and undershoot are penalized equally and a
/// perfect estimate scores exactly 100. Returns `None` unless both times are
/// positive.
pub fn accuracy(estimated_time: u32, actual_time: u32) -> Option<f64> {
    if estimated_time == 0 || actual_time == 0 {
        return None;
    }
    let est = estimated_time as f64;
    let act = actual_time as f64;
    Some((est / act).min(act / est) * 100.0)
}

/// Computes completion and time-usage statistics over `tasks`, optionally
/// scoped to a closed date range (inclusive on both ends).
///
/// Every empty-denominator case resolves to a defined zero, never an error:
/// no tasks means a 0% completion rate, and no completed task with both
/// times positive means 0% average accuracy.
pub fn task_stats(tasks: &[&Task], range: Option<&DateRange>) -> TaskStats {
    let scoped: Vec<&Task> = match range {
        Some(r) => tasks.iter().copied().filter(|t| r.contains(t.date)).collect(),
        None => tasks.to_vec(),
    };

    let total_tasks = scoped.len();
    let completed_tasks = scoped.iter().filter(|t| t.status == Status::Completed).count();
    let completion_rate = if total_tasks > 0 {
        completed_tasks as f64 / total_tasks as f64 * 100.0
    } else {
        0.0
    };

    let total_estimated_time = scoped.iter().map(|t| t.estimated_time as u64).sum();
    let total_actual_time = scoped.iter().map(|t| t.actual_time as u64).sum();

    let accuracies: Vec<f64> = scoped
        .iter()
        .filter(|t| t.status == Status::Completed)
        .filter_map(|t| accuracy(t.estimated_time, t.actual_time))
        .collect();
    let average_accuracy = if accuracies.is_empty() {
        0.0
    } else {
        accuracies.iter().sum::<f64>() / accuracies.len() as f64
    };

    TaskStats {
        total_tasks,
        completed_tasks,
        completion_rate,
        total_estimated_time,
        total_actual_time,
        average_accuracy,
    }
}

/// Relative date scope for task-list views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DateFilter {
    #[default]
    All,
    /// Scheduled for today's calendar date.
    Today,
    /// Scheduled on or after the most recent Sunday.
    ThisWeek,
    /// Scheduled in the current calendar month.
    ThisMonth,
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFilter::All => write!(f, "all"),
            DateFilter::Today => write!(f, "today"),
            DateFilter::ThisWeek => write!(f, "this-week"),
            DateFilter::ThisMonth => write!(f, "this-month"),
        }
    }
}

/// Multi-criteria filter for task-list views; all predicates are ANDed.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Case-insensitive substring matched against name OR category.
    pub search: String,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    /// Exact category match.
    pub category: Option<String>,
    pub date: DateFilter,
}

/// The most recent Sunday on or before `today`.
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(today.weekday().num_days_from_sunday() as i64)
}

/// Applies `filter` to `tasks`, preserving input order.
///
/// `today` is passed in rather than read from the clock so week and month
/// boundaries are stable across a whole render pass and testable.
pub fn filter_tasks<'a>(tasks: &[&'a Task], filter: &TaskFilter, today: NaiveDate) -> Vec<&'a Task> {
    let needle = filter.search.to_lowercase();
    tasks
        .iter()
        .copied()
        .filter(|t| {
            let matches_search = needle.is_empty()
                || t.name.to_lowercase().contains(&needle)
                || t.category.to_lowercase().contains(&needle);
            let matches_status = filter.status.map_or(true, |s| t.status == s);
            let matches_priority = filter.priority.map_or(true, |p| t.priority == p);
            let matches_category = filter
                .category
                .as_ref()
                .map_or(true, |c| t.category == *c);
            let matches_date = match filter.date {
                DateFilter::All => true,
                DateFilter::Today => t.date == today,
                DateFilter::ThisWeek => t.date >= week_start(today),
                DateFilter::ThisMonth => {
                    t.date.month() == today.month() && t.date.year() == today.year()
                }
            };
            matches_search && matches_status && matches_priority && matches_category && matches_date
        })
        .collect()
}
