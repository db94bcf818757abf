use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("todo-{nanos}-{file_name}"))
}

fn seed_single_task(store_path: &PathBuf) {
    let content = serde_json::json!([
        {
            "id": 1,
            "title": "original title",
            "description": "original description",
            "priority": "low",
            "status": "pending",
            "created_at": "2026-01-01T00:00:00Z"
        }
    ]);
    std::fs::write(store_path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

#[test]
fn update_changes_only_supplied_fields() {
    let exe = env!("CARGO_BIN_EXE_todo");
    let store_path = temp_path("cli-update-partial.json");
    seed_single_task(&store_path);

    let output = Command::new(exe)
        .args(["update", "1", "--title", "new title", "--priority", "high"])
        .env("TODO_STORE_PATH", &store_path)
        .output()
        .expect("failed to run update command");

    let saved = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let tasks: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(tasks[0]["title"], "new title");
    assert_eq!(tasks[0]["priority"], "high");
    assert_eq!(tasks[0]["description"], "original description");
    assert_eq!(tasks[0]["status"], "pending");
}

#[test]
fn update_to_completed_sets_completion_timestamp() {
    let exe = env!("CARGO_BIN_EXE_todo");
    let store_path = temp_path("cli-update-complete.json");
    seed_single_task(&store_path);

    let output = Command::new(exe)
        .args(["update", "1", "--status", "completed"])
        .env("TODO_STORE_PATH", &store_path)
        .output()
        .expect("failed to run update command");

    let saved = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let tasks: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(tasks[0]["status"], "completed");
    assert!(tasks[0]["completed_at"].is_string());
}

#[test]
fn update_to_in_progress_clears_completion_timestamp() {
    let exe = env!("CARGO_BIN_EXE_todo");
    let store_path = temp_path("cli-update-reopen.json");
    let content = serde_json::json!([
        {
            "id": 1,
            "title": "was done",
            "status": "completed",
            "created_at": "2026-01-01T00:00:00Z",
            "completed_at": "2026-01-02T00:00:00Z"
        }
    ]);
    std::fs::write(&store_path, serde_json::to_string_pretty(&content).unwrap()).unwrap();

    let output = Command::new(exe)
        .args(["update", "1", "--status", "in_progress"])
        .env("TODO_STORE_PATH", &store_path)
        .output()
        .expect("failed to run update command");

    let saved = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let tasks: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(tasks[0]["status"], "in_progress");
    assert_eq!(tasks[0]["completed_at"], serde_json::Value::Null);
}

#[test]
fn update_unknown_id_reports_not_found_with_success_exit() {
    let exe = env!("CARGO_BIN_EXE_todo");
    let store_path = temp_path("cli-update-missing.json");
    seed_single_task(&store_path);
    let before = std::fs::read_to_string(&store_path).unwrap();

    let output = Command::new(exe)
        .args(["update", "42", "--title", "never applied"])
        .env("TODO_STORE_PATH", &store_path)
        .output()
        .expect("failed to run update command");

    let after = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Task #42 not found."));
    assert_eq!(before, after);
}
