use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;
use crate::models::{Role, Task, User};

/// Returns the path to the tasks database file (`tasks.json`).
///
/// The path is determined in the following order:
/// 1. `STUDYTRACK_DB` environment variable.
/// 2. `~/.local/share/studytrack/tasks.json` (on Linux).
/// 3. `./tasks.json` (fallback).
fn db_path() -> PathBuf {
    std::env::var("STUDYTRACK_DB").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("studytrack");
        if !p.exists() {
            let _ = fs::create_dir_all(&p);
        }
        p.push("tasks.json");
        p
    })
}

/// Returns the path to the users database file (`users.json`).
///
/// Located in the same directory as the tasks database.
fn users_path() -> PathBuf {
    let mut p = db_path();
    p.pop();
    p.push("users.json");
    p
}

/// Returns the path to the session file (`session.json`).
///
/// Holds the currently logged-in user, if any.
fn session_path() -> PathBuf {
    let mut p = db_path();
    p.pop();
    p.push("session.json");
    p
}

fn read_file(path: &PathBuf) -> Option<String> {
    if !path.exists() {
        return None;
    }
    let mut f = match OpenOptions::new().read(true).open(path) {
        Ok(f) => f,
        Err(_) => return None,
    };
    let mut s = String::new();
    if f.read_to_string(&mut s).is_err() {
        return None;
    }
    Some(s)
}

fn write_file(path: &PathBuf, contents: &str) -> std::io::Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    f.write_all(contents.as_bytes())?;
    Ok(())
}

/// Loads all tasks from the storage file.
///
/// A missing or unreadable file yields an empty list. Corrupt JSON also
/// fails closed to an empty list, with a warning on stderr rather than a
/// crash.
pub fn load_tasks() -> Vec<Task> {
    let path = db_path();
    let s = match read_file(&path) {
        Some(s) => s,
        None => return Vec::new(),
    };
    serde_json::from_str(&s).unwrap_or_else(|e| {
        eprintln!(
            "Warning: could not parse {}: {}. Starting with an empty task list.",
            path.display(),
            e
        );
        Vec::new()
    })
}

/// Saves the given list of tasks to the storage file, overwriting it.
pub fn save_tasks(tasks: &[Task]) -> std::io::Result<()> {
    let s = serde_json::to_string_pretty(tasks).expect("tasks serialize to JSON");
    write_file(&db_path(), &s)
}

/// The roster written to `users.json` on first run.
fn default_users() -> Vec<User> {
    vec![
        User {
            id: "user1".into(),
            username: "alice_student".into(),
            password: "study123".into(),
            role: Role::User,
            name: "Alice Johnson".into(),
        },
        User {
            id: "user2".into(),
            username: "aditi".into(),
            password: "aditi123".into(),
            role: Role::User,
            name: "Aditi Dhiman".into(),
        },
        User {
            id: "user3".into(),
            username: "neeraj".into(),
            password: "neeraj123".into(),
            role: Role::User,
            name: "Neeraj Kumar".into(),
        },
        User {
            id: "admin1".into(),
            username: "admin".into(),
            password: "adminpass".into(),
            role: Role::Admin,
            name: "Administrator".into(),
        },
    ]
}

/// Loads the user roster, seeding the default accounts on first run.
pub fn load_users() -> Vec<User> {
    let path = users_path();
    let s = match read_file(&path) {
        Some(s) => s,
        None => {
            let users = default_users();
            if let Err(e) = save_users(&users) {
                eprintln!("Warning: could not seed {}: {}", path.display(), e);
            }
            return users;
        }
    };
    serde_json::from_str(&s).unwrap_or_else(|e| {
        eprintln!(
            "Warning: could not parse {}: {}. Using the default user roster.",
            path.display(),
            e
        );
        default_users()
    })
}

/// Saves the user roster, overwriting the existing file.
pub fn save_users(users: &[User]) -> std::io::Result<()> {
    let s = serde_json::to_string_pretty(users).expect("users serialize to JSON");
    write_file(&users_path(), &s)
}

/// Loads the logged-in user, if a session exists.
///
/// A corrupt session file is treated as no session.
pub fn load_session() -> Option<User> {
    let s = read_file(&session_path())?;
    match serde_json::from_str(&s) {
        Ok(user) => Some(user),
        Err(e) => {
            eprintln!("Warning: could not parse session file: {}. Treating as logged out.", e);
            None
        }
    }
}

/// Persists the logged-in user.
pub fn save_session(user: &User) -> std::io::Result<()> {
    let s = serde_json::to_string_pretty(user).expect("user serializes to JSON");
    write_file(&session_path(), &s)
}

/// Removes the session file, logging the user out.
pub fn clear_session() -> std::io::Result<()> {
    let path = session_path();
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Deletes the tasks, users, and session files.
pub fn delete_database() -> std::io::Result<()> {
    for path in [db_path(), users_path(), session_path()] {
        if path.exists() {
            fs::remove_file(path)?;
        }
    }
    Ok(())
}
