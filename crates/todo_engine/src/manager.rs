use crate::error::AppError;
use crate::model::{self, Priority, Status, Task};
use crate::storage::json_store::JsonStore;

/// Partial-update carrier for [`TaskManager::update`]. Fields left as `None`
/// are not touched on the task.
#[derive(Debug, Default, Clone)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
}

impl TaskChanges {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Owner of the in-memory task collection. Loads everything from the store
/// at construction and writes the whole collection back after every
/// mutation. Not-found is signalled with `bool`/`Option`, never an error.
pub struct TaskManager {
    store: JsonStore,
    tasks: Vec<Task>,
    load_warning: Option<AppError>,
    save_warning: Option<AppError>,
}

impl TaskManager {
    pub fn new(store: JsonStore) -> Self {
        let (mut tasks, load_warning) = store.load().into_parts();
        backfill_ids(&mut tasks);

        Self {
            store,
            tasks,
            load_warning,
            save_warning: None,
        }
    }

    /// Set when the store recovered from an unreadable or malformed file at
    /// load time; the collection started empty in that case.
    pub fn load_warning(&self) -> Option<&AppError> {
        self.load_warning.as_ref()
    }

    /// A failed save does not fail the mutation that triggered it; the
    /// error is parked here for the caller to surface.
    pub fn take_save_warning(&mut self) -> Option<AppError> {
        self.save_warning.take()
    }

    pub fn add(
        &mut self,
        title: &str,
        description: &str,
        priority: Priority,
    ) -> Result<Task, AppError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("title is required"));
        }

        let task = Task {
            id: Some(self.next_id()),
            title: trimmed.to_string(),
            description: description.to_string(),
            priority,
            status: Status::Pending,
            created_at: model::current_timestamp()?,
            completed_at: None,
        };

        self.tasks.push(task.clone());
        self.persist();

        Ok(task)
    }

    pub fn get_all(&self, status: Option<Status>) -> Vec<Task> {
        match status {
            None => self.tasks.clone(),
            Some(wanted) => self
                .tasks
                .iter()
                .filter(|task| task.status == wanted)
                .cloned()
                .collect(),
        }
    }

    pub fn get_by_id(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == Some(id))
    }

    /// Applies only the supplied fields. `Ok(false)` when the id is
    /// unknown; persists on any matched id, even when no field was
    /// supplied. A `Pending` status change leaves `completed_at` exactly
    /// as the last explicit completion transition set it.
    pub fn update(&mut self, id: u64, changes: &TaskChanges) -> Result<bool, AppError> {
        // Resolve the completion timestamp up front so a matched task is
        // never left completed without one.
        let completion_stamp = match changes.status {
            Some(Status::Completed) => Some(model::current_timestamp()?),
            _ => None,
        };

        let Some(task) = self.tasks.iter_mut().find(|task| task.id == Some(id)) else {
            return Ok(false);
        };

        if let Some(title) = changes.title.as_deref() {
            task.title = title.to_string();
        }
        if let Some(description) = changes.description.as_deref() {
            task.description = description.to_string();
        }
        if let Some(priority) = changes.priority {
            task.priority = priority;
        }
        if let Some(status) = changes.status {
            task.status = status;
            match status {
                Status::Completed => task.completed_at = completion_stamp,
                Status::InProgress => task.completed_at = None,
                Status::Pending => {}
            }
        }

        self.persist();
        Ok(true)
    }

    pub fn delete(&mut self, id: u64) -> bool {
        let Some(index) = self.tasks.iter().position(|task| task.id == Some(id)) else {
            return false;
        };

        self.tasks.remove(index);
        self.persist();
        true
    }

    pub fn mark_completed(&mut self, id: u64) -> Result<bool, AppError> {
        self.update(id, &TaskChanges::status(Status::Completed))
    }

    fn next_id(&self) -> u64 {
        self.tasks.iter().filter_map(|task| task.id).max().unwrap_or(0) + 1
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.tasks) {
            self.save_warning = Some(err);
        }
    }
}

/// Assign ids to loaded tasks that lack one, in collection order, continuing
/// from the highest id already present.
fn backfill_ids(tasks: &mut [Task]) {
    let mut max_id = tasks.iter().filter_map(|task| task.id).max().unwrap_or(0);

    for task in tasks.iter_mut() {
        if task.id.is_none() {
            max_id += 1;
            task.id = Some(max_id);
        }
    }
}
