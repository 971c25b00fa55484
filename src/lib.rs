//! # Studytrack
//!
//! A terminal study-task tracker written in Rust. Studytrack combines a fast CLI for quick entry with a TUI dashboard for interactive management, plus completion and estimate-accuracy statistics per user.
//!
//! ## Features
//!
//! *   **Per-user tracking**: Each account keeps its own task list; an admin account sees an overview across everyone.
//! *   **Dual Interface**:
//!     *   **CLI**: Scriptable and quick for single commands.
//!     *   **TUI**: Interactive dashboard with live filtering, statistics, and a task timer.
//! *   **Statistics**: Completion rate, time usage, and a symmetric estimate-accuracy score, optionally scoped to a date range.
//! *   **Filtering**: Search plus status, priority, category, and relative-date filters (today, this week, this month).
//! *   **Task Timer**: Start a stopwatch on a task from the dashboard; pausing or stopping commits whole minutes back into the task.
//! *   **CSV Export**: One row per task, ready for a spreadsheet.
//! *   **Data Persistence**: Tasks, users, and the session are stored in standard XDG data directories (JSON format).
//!
//! ## Installation
//!
//! ```bash
//! cargo install --path .
//! ```
//!
//! ## Usage
//!
//! ### Logging in
//!
//! Accounts live in `users.json`, seeded with a default roster on first run:
//!
//! ```bash
//! studytrack login alice_student study123
//! studytrack whoami
//! studytrack logout
//! ```
//!
//! ### Interactive Mode (TUI)
//!
//! Run the command without arguments (while logged in) to launch the dashboard:
//!
//! ```bash
//! studytrack
//! # or explicitly
//! studytrack ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit
//! *   `j`/`k`: Move selection
//! *   `a`: Add new task (wizard)
//! *   `Space`: Cycle status (pending → in-progress → completed)
//! *   `d`: Delete selected task
//! *   `n`/`c`/`y`/`e`: Edit name / category / date / estimate
//! *   `l`: Log minutes worked
//! *   `t`: Start or pause the timer on the selected task
//! *   `x`: Stop the timer and mark the task completed
//! *   `/`: Live search; `f`/`p`/`w`: cycle status / priority / date filters
//! *   `s`: Toggle the statistics panel
//!
//! ### Command Line Interface (CLI)
//!
//! **Adding and managing tasks**
//! ```bash
//! studytrack add "Algebra homework" --category Mathematics --priority high \
//!     --date 2025-12-01 --estimate 60
//!
//! # List with filters
//! studytrack list --search algebra --status pending --date this-week
//!
//! # Move a task through its lifecycle
//! studytrack status 3 in-progress
//! studytrack status 3 completed
//!
//! # Log minutes worked
//! studytrack log 3 45
//! ```
//!
//! **Statistics**
//! ```bash
//! studytrack stats
//! studytrack stats --from 2025-11-01 --to 2025-11-30
//!
//! # Admin-only cross-user overview
//! studytrack overview --from 2025-11-01 --to 2025-11-30
//! ```
//!
//! **Export**
//! ```bash
//! studytrack export --output my_tasks.csv
//! ```
//!
//! ## Data Storage
//!
//! Data is saved in your local data directory:
//! *   Linux: `~/.local/share/studytrack/tasks.json`
//! *   macOS: `~/Library/Application Support/studytrack/tasks.json`
//! *   Windows: `%APPDATA%\studytrack\tasks.json`
//!
//! `users.json` and `session.json` live beside it. You can override the
//! location by setting the `STUDYTRACK_DB` environment variable.
//!
//! ## Accuracy Score
//!
//! For each completed task with both times recorded, accuracy is
//! `min(estimated/actual, actual/estimated) * 100`: a perfect estimate scores
//! 100, and over- and under-estimation are penalized equally.

pub mod auth;
pub mod commands;
pub mod export;
pub mod models;
pub mod query;
pub mod storage;
pub mod store;
pub mod tui;
