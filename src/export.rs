use chrono::DateTime;
use crate::models::Task;

const HEADERS: [&str; 11] = [
    "Task Name",
    "Category",
    "Priority",
    "Status",
    "Date",
    "Start Time",
    "End Time",
    "Estimated Time (mins)",
    "Actual Time (mins)",
    "Created At",
    "Completed At",
];

/// Renders tasks as CSV text: a header row plus one row per task.
///
/// Timestamps are reformatted as `yyyy-MM-dd HH:mm:ss`; a missing
/// `completed_at` becomes an empty field.
pub fn tasks_to_csv(tasks: &[&Task]) -> String {
    let mut out = String::new();
    out.push_str(&HEADERS.map(csv_field).join(","));
    out.push('\n');
    for task in tasks {
        let row = [
            csv_field(&task.name),
            csv_field(&task.category),
            task.priority.to_string(),
            task.status.to_string(),
            task.date.to_string(),
            csv_field(&task.start_time),
            csv_field(&task.end_time),
            task.estimated_time.to_string(),
            task.actual_time.to_string(),
            format_stamp(&task.created_at),
            task.completed_at.as_deref().map(format_stamp).unwrap_or_default(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Quotes a field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn format_stamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
