use chrono::NaiveDate;
use studytrack::export::tasks_to_csv;
use studytrack::models::{Priority, Status, Task};

fn sample_task() -> Task {
    Task {
        id: 1,
        user_id: "user1".into(),
        name: "Algebra homework".into(),
        category: "Mathematics".into(),
        priority: Priority::High,
        status: Status::Completed,
        date: NaiveDate::parse_from_str("2024-01-05", "%Y-%m-%d").unwrap(),
        start_time: "09:00".into(),
        end_time: "10:00".into(),
        estimated_time: 60,
        actual_time: 55,
        created_at: "2024-01-04T18:30:00+00:00".into(),
        completed_at: Some("2024-01-05T10:02:30+00:00".into()),
    }
}

#[test]
fn test_csv_header_and_row() {
    let task = sample_task();
    let csv = tasks_to_csv(&[&task]);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Task Name,Category,Priority,Status,Date"));
    assert_eq!(
        lines[1],
        "Algebra homework,Mathematics,high,completed,2024-01-05,09:00,10:00,60,55,2024-01-04 18:30:00,2024-01-05 10:02:30"
    );
}

#[test]
fn test_csv_quotes_delimiters() {
    let mut task = sample_task();
    task.name = "Read, annotate \"Hamlet\"".into();
    let csv = tasks_to_csv(&[&task]);
    let row = csv.lines().nth(1).unwrap();
    assert!(row.starts_with("\"Read, annotate \"\"Hamlet\"\"\","));
}

#[test]
fn test_csv_missing_completed_at_is_empty() {
    let mut task = sample_task();
    task.status = Status::Pending;
    task.completed_at = None;
    let csv = tasks_to_csv(&[&task]);
    let row = csv.lines().nth(1).unwrap();
    assert!(row.ends_with("2024-01-04 18:30:00,"));
}

#[test]
fn test_csv_one_row_per_task() {
    let a = sample_task();
    let mut b = sample_task();
    b.id = 2;
    b.name = "Physics problem set".into();
    let csv = tasks_to_csv(&[&a, &b]);
    assert_eq!(csv.lines().count(), 3);
}
