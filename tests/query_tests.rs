use chrono::NaiveDate;
use studytrack::models::{DateRange, Priority, Status, Task};
use studytrack::query::{accuracy, filter_tasks, task_stats, week_start, DateFilter, TaskFilter};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn make_task(id: u64, day: &str, status: Status, estimated: u32, actual: u32) -> Task {
    Task {
        id,
        user_id: "user1".into(),
        name: format!("Task {}", id),
        category: "General".into(),
        priority: Priority::Medium,
        status,
        date: date(day),
        start_time: String::new(),
        end_time: String::new(),
        estimated_time: estimated,
        actual_time: actual,
        created_at: "2024-01-01T08:00:00+00:00".into(),
        completed_at: None,
    }
}

#[test]
fn test_stats_empty_collection() {
    let stats = task_stats(&[], None);
    assert_eq!(stats.total_tasks, 0);
    assert_eq!(stats.completed_tasks, 0);
    assert_eq!(stats.completion_rate, 0.0);
    assert_eq!(stats.total_estimated_time, 0);
    assert_eq!(stats.total_actual_time, 0);
    assert_eq!(stats.average_accuracy, 0.0);
}

#[test]
fn test_completion_rate_bounds() {
    let a = make_task(1, "2024-01-01", Status::Completed, 60, 60);
    let b = make_task(2, "2024-01-01", Status::Pending, 30, 0);
    let c = make_task(3, "2024-01-01", Status::InProgress, 30, 10);
    let stats = task_stats(&[&a, &b, &c], None);
    assert_eq!(stats.total_tasks, 3);
    assert_eq!(stats.completed_tasks, 1);
    assert!(stats.completion_rate > 0.0 && stats.completion_rate <= 100.0);
    assert!((stats.completion_rate - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_accuracy_symmetric() {
    // Underestimating by 2x and overestimating by 2x score the same.
    assert_eq!(accuracy(100, 50), Some(50.0));
    assert_eq!(accuracy(50, 100), Some(50.0));
    // A perfect estimate caps at exactly 100.
    assert_eq!(accuracy(60, 60), Some(100.0));
}

#[test]
fn test_accuracy_requires_both_times() {
    assert_eq!(accuracy(0, 50), None);
    assert_eq!(accuracy(50, 0), None);
    assert_eq!(accuracy(0, 0), None);
}

#[test]
fn test_accuracy_in_unit_range() {
    for (est, act) in [(1, 600), (600, 1), (37, 41), (90, 90), (1, 1)] {
        let a = accuracy(est, act).unwrap();
        assert!(a > 0.0 && a <= 100.0, "accuracy({}, {}) = {}", est, act, a);
    }
}

#[test]
fn test_date_range_is_inclusive() {
    let before = make_task(1, "2023-12-31", Status::Pending, 30, 0);
    let on_start = make_task(2, "2024-01-01", Status::Pending, 30, 0);
    let inside = make_task(3, "2024-01-05", Status::Pending, 30, 0);
    let on_end = make_task(4, "2024-01-10", Status::Pending, 30, 0);
    let after = make_task(5, "2024-01-11", Status::Pending, 30, 0);
    let range = DateRange { start: date("2024-01-01"), end: date("2024-01-10") };

    let stats = task_stats(&[&before, &on_start, &inside, &on_end, &after], Some(&range));
    assert_eq!(stats.total_tasks, 3);
}

#[test]
fn test_stats_scenario_single_day_range() {
    let done = make_task(1, "2024-01-01", Status::Completed, 60, 60);
    let pending = make_task(2, "2024-01-02", Status::Pending, 30, 0);
    let range = DateRange { start: date("2024-01-01"), end: date("2024-01-01") };

    let stats = task_stats(&[&done, &pending], Some(&range));
    assert_eq!(stats.total_tasks, 1);
    assert_eq!(stats.completed_tasks, 1);
    assert_eq!(stats.completion_rate, 100.0);
    assert_eq!(stats.average_accuracy, 100.0);
    assert_eq!(stats.total_estimated_time, 60);
    assert_eq!(stats.total_actual_time, 60);
}

#[test]
fn test_average_accuracy_skips_tasks_without_time() {
    // Completed but no actual time logged: excluded from the accuracy mean.
    let no_time = make_task(1, "2024-01-01", Status::Completed, 60, 0);
    // Pending with plausible times: excluded because it is not completed.
    let pending = make_task(2, "2024-01-01", Status::Pending, 60, 60);
    let half = make_task(3, "2024-01-01", Status::Completed, 100, 50);
    let exact = make_task(4, "2024-01-01", Status::Completed, 40, 40);

    let stats = task_stats(&[&no_time, &pending, &half, &exact], None);
    assert_eq!(stats.average_accuracy, 75.0);
}

#[test]
fn test_stats_idempotent() {
    let a = make_task(1, "2024-01-01", Status::Completed, 60, 45);
    let b = make_task(2, "2024-01-03", Status::Pending, 30, 0);
    let range = DateRange { start: date("2024-01-01"), end: date("2024-01-31") };

    let first = task_stats(&[&a, &b], Some(&range));
    let second = task_stats(&[&a, &b], Some(&range));
    assert_eq!(first, second);
}

#[test]
fn test_filter_search_case_insensitive() {
    let mut task = make_task(1, "2024-01-01", Status::Pending, 30, 0);
    task.name = "Algebra Homework".into();
    task.category = "Mathematics".into();

    let filter = TaskFilter { search: "algebra".into(), ..TaskFilter::default() };
    let found = filter_tasks(&[&task], &filter, date("2024-01-01"));
    assert_eq!(found.len(), 1);

    // Search also matches the category.
    let filter = TaskFilter { search: "MATH".into(), ..TaskFilter::default() };
    let found = filter_tasks(&[&task], &filter, date("2024-01-01"));
    assert_eq!(found.len(), 1);

    let filter = TaskFilter { search: "chemistry".into(), ..TaskFilter::default() };
    let found = filter_tasks(&[&task], &filter, date("2024-01-01"));
    assert!(found.is_empty());
}

#[test]
fn test_filter_predicates_are_anded() {
    let mut task = make_task(1, "2024-01-01", Status::Pending, 30, 0);
    task.name = "Algebra Homework".into();
    task.category = "Mathematics".into();

    // Search matches but the status filter does not.
    let filter = TaskFilter {
        search: "algebra".into(),
        status: Some(Status::Completed),
        ..TaskFilter::default()
    };
    let found = filter_tasks(&[&task], &filter, date("2024-01-01"));
    assert!(found.is_empty());
}

#[test]
fn test_filter_category_exact_match() {
    let math = make_task(1, "2024-01-01", Status::Pending, 30, 0);
    let mut physics = make_task(2, "2024-01-01", Status::Pending, 30, 0);
    physics.category = "Physics".into();

    let filter = TaskFilter { category: Some("Physics".into()), ..TaskFilter::default() };
    let found = filter_tasks(&[&math, &physics], &filter, date("2024-01-01"));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 2);
}

#[test]
fn test_week_start_is_most_recent_sunday() {
    // 2024-01-10 is a Wednesday; the week began Sunday 2024-01-07.
    assert_eq!(week_start(date("2024-01-10")), date("2024-01-07"));
    // A Sunday is its own week start.
    assert_eq!(week_start(date("2024-01-07")), date("2024-01-07"));
}

#[test]
fn test_date_filter_this_week() {
    let today = date("2024-01-10"); // Wednesday
    let sunday = make_task(1, "2024-01-07", Status::Pending, 30, 0);
    let saturday_before = make_task(2, "2024-01-06", Status::Pending, 30, 0);
    let upcoming = make_task(3, "2024-01-12", Status::Pending, 30, 0);

    let filter = TaskFilter { date: DateFilter::ThisWeek, ..TaskFilter::default() };
    let found = filter_tasks(&[&sunday, &saturday_before, &upcoming], &filter, today);
    let ids: Vec<u64> = found.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn test_date_filter_today_and_this_month() {
    let today = date("2024-01-10");
    let same_day = make_task(1, "2024-01-10", Status::Pending, 30, 0);
    let same_month = make_task(2, "2024-01-25", Status::Pending, 30, 0);
    let last_year_same_month = make_task(3, "2023-01-10", Status::Pending, 30, 0);

    let filter = TaskFilter { date: DateFilter::Today, ..TaskFilter::default() };
    let found = filter_tasks(&[&same_day, &same_month, &last_year_same_month], &filter, today);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);

    let filter = TaskFilter { date: DateFilter::ThisMonth, ..TaskFilter::default() };
    let found = filter_tasks(&[&same_day, &same_month, &last_year_same_month], &filter, today);
    let ids: Vec<u64> = found.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_filter_preserves_insertion_order() {
    let a = make_task(5, "2024-01-01", Status::Pending, 30, 0);
    let b = make_task(2, "2024-01-02", Status::Pending, 30, 0);
    let c = make_task(9, "2024-01-03", Status::Pending, 30, 0);

    let found = filter_tasks(&[&a, &b, &c], &TaskFilter::default(), date("2024-01-10"));
    let ids: Vec<u64> = found.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![5, 2, 9]);
}
