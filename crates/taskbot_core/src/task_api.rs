use crate::error::AppError;
use crate::model::{ChatId, Task, TaskList};
use crate::storage::json_store;
use std::path::{Path, PathBuf};

pub const MAX_TASK_TEXT_LEN: usize = 300;

/// Per-chat task lists persisted in a single JSON file. Every mutation is a
/// full read-modify-write of that file.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(json_store::store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add_task(&self, chat: ChatId, raw_text: &str) -> Result<Task, AppError> {
        add_task_with_path(&self.path, chat, raw_text)
    }

    pub fn list_tasks(&self, chat: ChatId) -> Result<Vec<Task>, AppError> {
        list_tasks_with_path(&self.path, chat)
    }

    pub fn delete_task(&self, chat: ChatId, position: i64) -> Result<Task, AppError> {
        delete_task_with_path(&self.path, chat, position)
    }

    pub fn clear_tasks(&self, chat: ChatId) -> Result<usize, AppError> {
        clear_tasks_with_path(&self.path, chat)
    }
}

fn validate_text(raw_text: &str) -> Result<&str, AppError> {
    let trimmed = raw_text.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("task text is required"));
    }

    if trimmed.chars().count() > MAX_TASK_TEXT_LEN {
        return Err(AppError::validation(format!(
            "task text must be at most {MAX_TASK_TEXT_LEN} characters"
        )));
    }

    Ok(trimmed)
}

fn add_task_with_path(path: &Path, chat: ChatId, raw_text: &str) -> Result<Task, AppError> {
    let text = validate_text(raw_text)?;

    let mut store = json_store::load_store(path)?;
    let task = store.entry(chat).or_default().push(text);
    json_store::save_store(path, &store)?;

    tracing::debug!(chat, position = task.position, "task added");
    Ok(task)
}

fn list_tasks_with_path(path: &Path, chat: ChatId) -> Result<Vec<Task>, AppError> {
    let mut store = json_store::load_store(path)?;
    Ok(store.remove(&chat).map(TaskList::into_tasks).unwrap_or_default())
}

fn delete_task_with_path(path: &Path, chat: ChatId, position: i64) -> Result<Task, AppError> {
    let mut store =
        json_store::load_existing(path)?.ok_or_else(|| AppError::not_found("no tasks yet"))?;

    let list = store
        .get_mut(&chat)
        .filter(|list| !list.is_empty())
        .ok_or_else(|| AppError::not_found("your task list is empty"))?;

    let removed = list
        .remove(position)
        .ok_or_else(|| AppError::not_found(format!("task {position} doesn't exist")))?;

    if list.is_empty() {
        store.remove(&chat);
    }
    json_store::save_store(path, &store)?;

    tracing::debug!(chat, position, "task deleted");
    Ok(removed)
}

fn clear_tasks_with_path(path: &Path, chat: ChatId) -> Result<usize, AppError> {
    let Some(mut store) = json_store::load_existing(path)? else {
        return Ok(0);
    };

    let removed = store.remove(&chat).map(|list| list.len()).unwrap_or(0);
    if removed > 0 {
        json_store::save_store(path, &store)?;
        tracing::debug!(chat, removed, "task list cleared");
    }

    Ok(removed)
}
