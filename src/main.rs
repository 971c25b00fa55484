use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use studytrack::auth;
use studytrack::commands::*;
use studytrack::models::{Priority, Status, User};
use studytrack::query::DateFilter;
use studytrack::store::TaskStore;
use studytrack::tui::run_tui;

#[derive(Parser)]
#[command(name = "studytrack")]
#[command(about = "Terminal study-task tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in as a user
    Login {
        username: String,
        password: String,
    },
    /// Log out the current user
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Add a new task
    Add {
        /// Task name (quoted if it has spaces)
        name: String,
        /// Subject or category
        #[arg(short, long, default_value = "General")]
        category: String,
        /// Priority
        #[arg(short, long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Scheduled date in YYYY-MM-DD
        #[arg(short, long)]
        date: String,
        /// Planned start time (HH:MM)
        #[arg(long)]
        start: Option<String>,
        /// Planned end time (HH:MM)
        #[arg(long)]
        end: Option<String>,
        /// Estimated duration in minutes
        #[arg(short, long)]
        estimate: Option<u32>,
    },
    /// List tasks
    List {
        /// Search term matched against name or category
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by status
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by priority
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Filter by exact category
        #[arg(short, long)]
        category: Option<String>,
        /// Relative date filter
        #[arg(short, long, value_enum, default_value_t = DateFilter::All)]
        date: DateFilter,
        /// Show every user's tasks (admin only)
        #[arg(long)]
        all_users: bool,
    },
    /// Set a task's status
    Status {
        id: u64,
        #[arg(value_enum)]
        status: Status,
    },
    /// Edit a task
    Edit {
        id: u64,
        /// New task name
        #[arg(short, long)]
        name: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New priority
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,
        /// New scheduled date
        #[arg(short, long)]
        date: Option<String>,
        /// New start time
        #[arg(long)]
        start: Option<String>,
        /// New end time
        #[arg(long)]
        end: Option<String>,
        /// New estimated minutes
        #[arg(short, long)]
        estimate: Option<u32>,
        /// New actual minutes
        #[arg(short, long)]
        actual: Option<u32>,
    },
    /// Log minutes worked on a task
    Log {
        id: u64,
        /// Minutes to add
        minutes: u32,
    },
    /// Remove a task
    Remove {
        id: u64,
    },
    /// Show completion and time-usage statistics
    Stats {
        /// Range start (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<String>,
        /// Range end (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,
    },
    /// Per-user statistics overview (admin only)
    Overview {
        /// Range start (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<String>,
        /// Range end (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,
    },
    /// Export the current user's tasks as CSV
    Export {
        /// Output file (defaults to tasks_<username>_<date>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Reset the database (delete all tasks, users, and the session)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open the interactive TUI dashboard
    Ui,
}

fn require_user() -> Option<User> {
    let user = auth::current_user();
    if user.is_none() {
        eprintln!("Not logged in. Run `studytrack login <username> <password>` first.");
    }
    user
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Login { username, password }) => cmd_login(username, password, false),
        Some(Commands::Logout) => cmd_logout(false),
        Some(Commands::Whoami) => cmd_whoami(),
        Some(Commands::Add { name, category, priority, date, start, end, estimate }) => {
            if let Some(user) = require_user() {
                let mut store = TaskStore::load();
                cmd_add(&mut store, &user, name, category, priority, date, start, end, estimate, false);
            }
        }
        Some(Commands::List { search, status, priority, category, date, all_users }) => {
            if let Some(user) = require_user() {
                let store = TaskStore::load();
                cmd_list(&store, &user, search, status, priority, category, date, all_users);
            }
        }
        Some(Commands::Status { id, status }) => {
            let mut store = TaskStore::load();
            cmd_status(&mut store, id, status, false);
        }
        Some(Commands::Edit { id, name, category, priority, date, start, end, estimate, actual }) => {
            let mut store = TaskStore::load();
            cmd_edit(&mut store, id, name, category, priority, date, start, end, estimate, actual, false);
        }
        Some(Commands::Log { id, minutes }) => {
            let mut store = TaskStore::load();
            cmd_log(&mut store, id, minutes, false);
        }
        Some(Commands::Remove { id }) => {
            let mut store = TaskStore::load();
            cmd_remove(&mut store, id, false);
        }
        Some(Commands::Stats { from, to }) => {
            if let Some(user) = require_user() {
                let store = TaskStore::load();
                cmd_stats(&store, &user, from, to);
            }
        }
        Some(Commands::Overview { from, to }) => {
            if let Some(user) = require_user() {
                let store = TaskStore::load();
                cmd_overview(&store, &user, from, to);
            }
        }
        Some(Commands::Export { output }) => {
            if let Some(user) = require_user() {
                let store = TaskStore::load();
                cmd_export(&store, &user, output, false);
            }
        }
        Some(Commands::Reset { force }) => cmd_reset(force),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "studytrack", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            if let Some(user) = require_user() {
                let store = TaskStore::load();
                if let Err(e) = run_tui(store, user) {
                    eprintln!("Error running TUI: {}", e);
                }
            }
        }
    }
}
