use chrono::NaiveDate;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use studytrack::auth;
use studytrack::models::{NewTask, Priority, Status, TaskUpdate};
use studytrack::storage::load_tasks;
use studytrack::store::{CompletedAtPolicy, TaskStore};

// Use a mutex to ensure tests run serially since they modify the environment variable
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_test_db<F>(test_name: &str, f: F)
where
    F: FnOnce(PathBuf),
{
    let _guard = TEST_MUTEX.lock().unwrap();

    let mut dir = env::temp_dir();
    dir.push(format!("studytrack_test_{}", test_name));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();

    let mut db_path = dir.clone();
    db_path.push("tasks.json");
    env::set_var("STUDYTRACK_DB", db_path.to_str().unwrap());

    f(db_path);

    fs::remove_dir_all(&dir).unwrap();
    env::remove_var("STUDYTRACK_DB");
}

fn new_task(user_id: &str, name: &str) -> NewTask {
    NewTask {
        user_id: user_id.into(),
        name: name.into(),
        category: "General".into(),
        priority: Priority::Medium,
        date: NaiveDate::parse_from_str("2025-12-01", "%Y-%m-%d").unwrap(),
        start_time: String::new(),
        end_time: String::new(),
        estimated_time: 60,
    }
}

#[test]
fn test_add_forces_pending_and_zero_actual() {
    with_test_db("add", |_path| {
        let mut store = TaskStore::load();
        let id = store.add_task(new_task("user1", "Read chapter 4")).unwrap();

        let task = store.get(id).unwrap();
        assert_eq!(task.status, Status::Pending);
        assert_eq!(task.actual_time, 0);
        assert!(task.completed_at.is_none());
        assert!(!task.created_at.is_empty());

        // Persisted immediately: a fresh load sees the task.
        let on_disk = load_tasks();
        assert_eq!(on_disk.len(), 1);
        assert_eq!(on_disk[0].name, "Read chapter 4");
    });
}

#[test]
fn test_ids_are_unique_and_increasing() {
    with_test_db("ids", |_path| {
        let mut store = TaskStore::load();
        let a = store.add_task(new_task("user1", "A")).unwrap();
        let b = store.add_task(new_task("user1", "B")).unwrap();
        assert_ne!(a, b);

        // Ids stay unique within the live collection after a delete.
        store.delete_task(b).unwrap();
        let c = store.add_task(new_task("user1", "C")).unwrap();
        assert_ne!(a, c);
    });
}

#[test]
fn test_update_merges_fields() {
    with_test_db("update", |_path| {
        let mut store = TaskStore::load();
        let id = store.add_task(new_task("user1", "Essay draft")).unwrap();

        let changed = store
            .update_task(id, TaskUpdate {
                name: Some("Essay final".into()),
                priority: Some(Priority::High),
                actual_time: Some(45),
                ..TaskUpdate::default()
            })
            .unwrap();
        assert!(changed);

        let task = store.get(id).unwrap();
        assert_eq!(task.name, "Essay final");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.actual_time, 45);
        // Untouched fields survive the merge.
        assert_eq!(task.category, "General");
        assert_eq!(task.estimated_time, 60);
    });
}

#[test]
fn test_completed_at_stamped_once() {
    with_test_db("completed_at", |_path| {
        let mut store = TaskStore::load();
        let id = store.add_task(new_task("user1", "Flashcards")).unwrap();

        store
            .update_task(id, TaskUpdate { status: Some(Status::Completed), ..TaskUpdate::default() })
            .unwrap();
        let first = store.get(id).unwrap().completed_at.clone();
        assert!(first.is_some());

        // Completing an already-completed task must not restamp.
        store
            .update_task(id, TaskUpdate { status: Some(Status::Completed), ..TaskUpdate::default() })
            .unwrap();
        assert_eq!(store.get(id).unwrap().completed_at, first);
    });
}

#[test]
fn test_completed_at_retained_on_regress_by_default() {
    with_test_db("retain", |_path| {
        let mut store = TaskStore::load();
        let id = store.add_task(new_task("user1", "Revise notes")).unwrap();

        store
            .update_task(id, TaskUpdate { status: Some(Status::Completed), ..TaskUpdate::default() })
            .unwrap();
        store
            .update_task(id, TaskUpdate { status: Some(Status::Pending), ..TaskUpdate::default() })
            .unwrap();

        // Historical behavior: the stale stamp survives the regression.
        assert!(store.get(id).unwrap().completed_at.is_some());
    });
}

#[test]
fn test_completed_at_cleared_under_clear_on_regress() {
    with_test_db("clear_policy", |_path| {
        let mut store = TaskStore::with_policy(CompletedAtPolicy::ClearOnRegress);
        let id = store.add_task(new_task("user1", "Revise notes")).unwrap();

        store
            .update_task(id, TaskUpdate { status: Some(Status::Completed), ..TaskUpdate::default() })
            .unwrap();
        store
            .update_task(id, TaskUpdate { status: Some(Status::Pending), ..TaskUpdate::default() })
            .unwrap();

        assert!(store.get(id).unwrap().completed_at.is_none());

        // Completing again restamps from scratch.
        store
            .update_task(id, TaskUpdate { status: Some(Status::Completed), ..TaskUpdate::default() })
            .unwrap();
        assert!(store.get(id).unwrap().completed_at.is_some());
    });
}

#[test]
fn test_missing_id_is_a_quiet_no_op() {
    with_test_db("missing_id", |_path| {
        let mut store = TaskStore::load();
        store.add_task(new_task("user1", "Only task")).unwrap();

        let updated = store
            .update_task(9999, TaskUpdate { name: Some("ghost".into()), ..TaskUpdate::default() })
            .unwrap();
        assert!(!updated);

        let deleted = store.delete_task(9999).unwrap();
        assert!(!deleted);
        assert_eq!(store.tasks().len(), 1);
    });
}

#[test]
fn test_user_tasks_scoped_and_ordered() {
    with_test_db("user_scope", |_path| {
        let mut store = TaskStore::load();
        store.add_task(new_task("user1", "First")).unwrap();
        store.add_task(new_task("user2", "Other user")).unwrap();
        store.add_task(new_task("user1", "Second")).unwrap();

        let mine = store.user_tasks("user1");
        let names: Vec<&str> = mine.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
        assert!(mine.iter().all(|t| t.user_id == "user1"));
    });
}

#[test]
fn test_corrupt_database_fails_closed() {
    with_test_db("corrupt", |path| {
        fs::write(&path, "{ not valid json").unwrap();
        let store = TaskStore::load();
        assert!(store.tasks().is_empty());
    });
}

#[test]
fn test_login_logout_roundtrip() {
    with_test_db("auth", |_path| {
        // Roster is seeded on first access.
        assert!(auth::login("alice_student", "wrong").is_none());
        assert!(auth::current_user().is_none());

        let user = auth::login("alice_student", "study123").unwrap();
        assert_eq!(user.id, "user1");
        assert_eq!(auth::current_user().unwrap().username, "alice_student");

        auth::logout().unwrap();
        assert!(auth::current_user().is_none());
    });
}
