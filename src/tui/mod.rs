pub mod app;
pub mod ui;

use std::{error::Error, io, time::Duration};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use crate::models::User;
use crate::store::TaskStore;
use app::{App, InputField, InputMode};
use ui::ui;

pub fn run_tui(store: TaskStore, user: User) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(store, user);

    // Run loop
    let res = run_app(&mut terminal, &mut app);

    // A running timer must not leak past the dashboard.
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        // Poll once per second while the timer runs so the elapsed display
        // ticks; otherwise block longer to stay idle.
        let timeout = if app.timer.is_some() {
            Duration::from_secs(1)
        } else {
            Duration::from_millis(250)
        };
        if !event::poll(timeout)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            app.warning = None;
            match app.input_mode {
                InputMode::Normal => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Char(' ') => app.cycle_status_selected(),
                    KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                    KeyCode::Char('a') => app.start_add(),
                    KeyCode::Char('n') => app.start_edit(InputField::Name),
                    KeyCode::Char('c') => app.start_edit(InputField::Category),
                    KeyCode::Char('y') => app.start_edit(InputField::Date),
                    KeyCode::Char('e') => app.start_edit(InputField::Estimate),
                    KeyCode::Char('l') => app.start_edit(InputField::LogMinutes),
                    KeyCode::Char('t') => app.timer_toggle(),
                    KeyCode::Char('x') => app.timer_stop(),
                    KeyCode::Char('/') => app.start_search(),
                    KeyCode::Char('f') => app.cycle_status_filter(),
                    KeyCode::Char('p') => app.cycle_priority_filter(),
                    KeyCode::Char('w') => app.cycle_date_filter(),
                    KeyCode::Char('s') => app.show_stats = !app.show_stats,
                    _ => {}
                },
                InputMode::Searching => match key.code {
                    KeyCode::Enter | KeyCode::Esc => {
                        app.input_mode = InputMode::Normal;
                    }
                    KeyCode::Char(c) => app.search_push(c),
                    KeyCode::Backspace => app.search_pop(),
                    _ => {}
                },
                InputMode::Editing | InputMode::Adding => match key.code {
                    KeyCode::Enter => app.handle_input(),
                    KeyCode::Esc => {
                        app.input_mode = InputMode::Normal;
                        app.input_buffer.clear();
                    }
                    KeyCode::Char(c) => {
                        app.input_buffer.push(c);
                    }
                    KeyCode::Backspace => {
                        app.input_buffer.pop();
                    }
                    _ => {}
                },
            }
        }
    }
}
