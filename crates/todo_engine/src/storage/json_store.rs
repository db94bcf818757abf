use crate::config;
use crate::error::AppError;
use crate::model::Task;
use std::path::{Path, PathBuf};

/// Persistence boundary. Translates the full task collection to and from a
/// single JSON document; the only component that touches the filesystem.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

/// What `load` found on disk. A malformed or unreadable file degrades to an
/// empty collection carrying the error as a warning; losing the ability to
/// start at all would be worse than starting empty.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Vec<Task>),
    Missing,
    Recovered(AppError),
}

impl LoadOutcome {
    pub fn into_parts(self) -> (Vec<Task>, Option<AppError>) {
        match self {
            Self::Loaded(tasks) => (tasks, None),
            Self::Missing => (Vec::new(), None),
            Self::Recovered(err) => (Vec::new(), Some(err)),
        }
    }
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the per-user config location.
    pub fn open_default() -> Result<Self, AppError> {
        Ok(Self::new(config::store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> LoadOutcome {
        if !self.path.exists() {
            return LoadOutcome::Missing;
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => return LoadOutcome::Recovered(AppError::read_failed(&self.path, err)),
        };

        match serde_json::from_str::<Vec<Task>>(&content) {
            Ok(tasks) => LoadOutcome::Loaded(tasks),
            Err(err) => LoadOutcome::Recovered(AppError::malformed_store(&self.path, err)),
        }
    }

    /// Whole-file replace: the file always reflects exactly the last
    /// successfully saved collection.
    pub fn save(&self, tasks: &[Task]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| AppError::write_failed(&self.path, err))?;
        }

        let content = serde_json::to_string_pretty(tasks)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|err| AppError::write_failed(&self.path, err))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions)
                .map_err(|err| AppError::write_failed(&self.path, err))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonStore, LoadOutcome};
    use crate::model::{Priority, Status, Task};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("todo-{nanos}-{file_name}"))
    }

    fn sample_task(id: u64, title: &str) -> Task {
        Task {
            id: Some(id),
            title: title.to_string(),
            description: String::new(),
            priority: Priority::Medium,
            status: Status::Pending,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            completed_at: None,
        }
    }

    #[test]
    fn load_missing_file_is_not_an_error() {
        let store = JsonStore::new(temp_path("missing.json"));
        let (tasks, warning) = store.load().into_parts();

        assert!(tasks.is_empty());
        assert!(warning.is_none());
        assert!(matches!(store.load(), LoadOutcome::Missing));
    }

    #[test]
    fn save_and_load_round_trip_empty_collection() {
        let store = JsonStore::new(temp_path("round-trip-empty.json"));

        store.save(&[]).unwrap();
        let (tasks, warning) = store.load().into_parts();
        fs::remove_file(store.path()).ok();

        assert!(tasks.is_empty());
        assert!(warning.is_none());
    }

    #[test]
    fn save_and_load_round_trip_single_task() {
        let store = JsonStore::new(temp_path("round-trip-one.json"));
        let task = sample_task(1, "demo");

        store.save(std::slice::from_ref(&task)).unwrap();
        let (tasks, warning) = store.load().into_parts();
        fs::remove_file(store.path()).ok();

        assert!(warning.is_none());
        assert_eq!(tasks, vec![task]);
    }

    #[test]
    fn save_and_load_round_trip_mixed_completion() {
        let store = JsonStore::new(temp_path("round-trip-mixed.json"));
        let open = sample_task(1, "open");
        let done = Task {
            id: Some(2),
            title: "done".to_string(),
            description: "with notes".to_string(),
            priority: Priority::High,
            status: Status::Completed,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            completed_at: Some("2026-01-02T08:30:00Z".to_string()),
        };

        store.save(&[open.clone(), done.clone()]).unwrap();
        let (tasks, _) = store.load().into_parts();
        fs::remove_file(store.path()).ok();

        assert_eq!(tasks, vec![open, done]);
    }

    #[test]
    fn load_corrupted_file_recovers_to_empty() {
        let store = JsonStore::new(temp_path("corrupted.json"));
        fs::write(store.path(), "{ not json at all").unwrap();

        let (tasks, warning) = store.load().into_parts();
        fs::remove_file(store.path()).ok();

        assert!(tasks.is_empty());
        let warning = warning.unwrap();
        assert_eq!(warning.code(), "invalid_data");
        assert!(warning.message().contains("corrupted.json"));
    }

    #[test]
    fn load_tolerates_records_without_ids() {
        let store = JsonStore::new(temp_path("legacy-ids.json"));
        let content = "[\n  {\n    \"title\": \"legacy\",\n    \"created_at\": \"2026-01-01T00:00:00Z\"\n  }\n]";
        fs::write(store.path(), content).unwrap();

        let (tasks, warning) = store.load().into_parts();
        fs::remove_file(store.path()).ok();

        assert!(warning.is_none());
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, None);
        assert_eq!(tasks[0].title, "legacy");
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = temp_path("nested-dir");
        let store = JsonStore::new(dir.join("todos.json"));

        store.save(&[sample_task(1, "demo")]).unwrap();
        let saved = store.path().exists();
        fs::remove_file(store.path()).ok();
        fs::remove_dir(&dir).ok();

        assert!(saved);
    }

    #[test]
    fn save_overwrites_previous_content() {
        let store = JsonStore::new(temp_path("overwrite.json"));

        store
            .save(&[sample_task(1, "first"), sample_task(2, "second")])
            .unwrap();
        store.save(&[sample_task(1, "first")]).unwrap();

        let (tasks, _) = store.load().into_parts();
        fs::remove_file(store.path()).ok();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "first");
    }
}
