use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table},
    Frame,
};
use crate::models::{Priority, Status};
use super::app::{App, InputField, InputMode};

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filter bar / timer
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Help / warnings
        ].as_ref())
        .split(f.area());

    render_filter_bar(f, app, chunks[0]);
    render_task_table(f, app, chunks[1]);
    render_help(f, app, chunks[2]);

    if app.show_stats {
        render_stats_popup(f, app);
    }
    render_input_popup(f, app);
}

fn render_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let status = match app.filter.status {
        None => "all".to_string(),
        Some(s) => s.to_string(),
    };
    let priority = match app.filter.priority {
        None => "all".to_string(),
        Some(p) => p.to_string(),
    };
    let date = app.filter.date.to_string();

    let timer = match &app.timer {
        Some(session) => {
            let total = session.total_secs();
            format!("  |  Timer on #{}: {}:{:02}", session.task_id, total / 60, total % 60)
        }
        None => String::new(),
    };

    let line = format!(
        "search: '{}'  status: {}  priority: {}  date: {}{}",
        app.filter.search, status, priority, date, timer
    );
    let style = if app.timer.is_some() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };
    let title = format!("Studytrack - {}", app.user.name);
    let bar = Paragraph::new(line)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(bar, area);
}

fn render_task_table(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .tasks
        .iter()
        .map(|t| {
            let style = match t.status {
                Status::Completed => Style::default().fg(Color::Green),
                Status::InProgress => Style::default().fg(Color::Blue),
                Status::Pending => match t.priority {
                    Priority::High => Style::default().fg(Color::Red),
                    Priority::Medium => Style::default().fg(Color::Yellow),
                    Priority::Low => Style::default(),
                },
            };

            Row::new(vec![
                Cell::from(t.id.to_string()),
                Cell::from(t.name.clone()),
                Cell::from(t.category.clone()),
                Cell::from(t.priority.to_string()),
                Cell::from(t.status.to_string()),
                Cell::from(t.date.to_string()),
                Cell::from(t.estimated_time.to_string()),
                Cell::from(t.actual_time.to_string()),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(14),
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["ID", "Name", "Category", "Prio", "Status", "Date", "Est", "Act"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title("Tasks"))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_help(f: &mut Frame, app: &App, area: Rect) {
    let help_text = if let Some(warning) = &app.warning {
        warning.clone()
    } else {
        match app.input_mode {
            InputMode::Normal => {
                "q: Quit | a: Add | Space: Status | d: Del | n: Name | c: Cat | y: Date | e: Est | l: Log | t: Timer | x: Stop+Done | /: Search | f/p/w: Filters | s: Stats".to_string()
            }
            InputMode::Editing => "Enter: Save | Esc: Cancel".to_string(),
            InputMode::Adding => "Enter: Next Step | Esc: Cancel".to_string(),
            InputMode::Searching => "Type to search | Enter/Esc: Done".to_string(),
        }
    };

    let style = if app.warning.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Gray)
    };
    let help = Paragraph::new(help_text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

fn render_stats_popup(f: &mut Frame, app: &App) {
    let stats = app.stats();
    let area = centered_rect(60, 10, f.area());
    f.render_widget(Clear, area);

    let block = Block::default().borders(Borders::ALL).title("Statistics");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)].as_ref())
        .split(inner);

    let text = format!(
        "Tasks: {}   Completed: {}\nEstimated: {} min   Actual: {} min\nAvg accuracy: {:.1}%",
        stats.total_tasks,
        stats.completed_tasks,
        stats.total_estimated_time,
        stats.total_actual_time,
        stats.average_accuracy,
    );
    f.render_widget(Paragraph::new(text), chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().title("Completion"))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(stats.completion_rate.round().clamp(0.0, 100.0) as u16);
    f.render_widget(gauge, chunks[1]);
}

fn render_input_popup(f: &mut Frame, app: &App) {
    match app.input_mode {
        InputMode::Editing | InputMode::Adding => {
            let area = centered_rect(60, 3, f.area());
            f.render_widget(Clear, area);

            let title = match app.input_mode {
                InputMode::Adding => match app.add_state.step {
                    0 => "Add Task: Enter Name",
                    1 => "Add Task: Enter Category",
                    2 => "Add Task: Enter Date (YYYY-MM-DD)",
                    3 => "Add Task: Enter Estimated Minutes",
                    4 => "Add Task: Enter Priority (high/medium/low)",
                    _ => "Add Task",
                },
                InputMode::Editing => match app.input_field {
                    InputField::Name => "Edit Name",
                    InputField::Category => "Edit Category",
                    InputField::Date => "Edit Date (YYYY-MM-DD)",
                    InputField::Estimate => "Edit Estimated Minutes",
                    InputField::LogMinutes => "Log Minutes Worked",
                    InputField::None => "Edit",
                },
                _ => "",
            };

            let input = Paragraph::new(app.input_buffer.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title(title));
            f.render_widget(input, area);
        }
        _ => {}
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height.saturating_sub(height)) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
