use chrono::Utc;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::error_handling::{ErrorContext, LogHelper, MindFlowError, Result};
use crate::domain::task::{SubTask, Task, TaskUpdate};
use crate::domain::user::UserId;
use crate::repository::TaskStore;

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, user: &UserId, task: Task) -> Result<Task> {
        validate_title(&task.title)?;

        if let Some(category_id) = task.category_id {
            self.ensure_category(user, category_id).await?;
        }

        ErrorContext::new("create_task")
            .with_detail("task_id", task.id)
            .wrap(self.store.create_task(user, &task).await)?;
        LogHelper::log_task_operation("create", task.id, true);
        Ok(task)
    }

    /// Applies a partial update. Moving the task to a category `user` does
    /// not own fails with `CategoryNotFound`.
    pub async fn update(&self, user: &UserId, id: Uuid, update: TaskUpdate) -> Result<()> {
        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        if let Some(Some(category_id)) = update.category_id {
            self.ensure_category(user, category_id).await?;
        }
        if update.is_empty() {
            return Ok(());
        }

        let applied = ErrorContext::new("update_task")
            .with_detail("task_id", id)
            .wrap(self.store.update_task(id, update).await)?;
        LogHelper::log_task_operation("update", id, applied);
        if applied {
            Ok(())
        } else {
            Err(MindFlowError::TaskNotFound { id })
        }
    }

    pub async fn complete(&self, user: &UserId, id: Uuid) -> Result<()> {
        self.update(user, id, TaskUpdate::complete(Utc::now())).await
    }

    pub async fn reopen(&self, user: &UserId, id: Uuid) -> Result<()> {
        self.update(user, id, TaskUpdate::reopen()).await
    }

    pub async fn add_subtask(&self, task_id: Uuid, title: &str) -> Result<SubTask> {
        validate_title(title)?;
        let subtask = SubTask::new(title.trim());

        let added = ErrorContext::new("add_subtask")
            .with_detail("task_id", task_id)
            .wrap(self.store.add_subtask(task_id, &subtask).await)?;
        if !added {
            return Err(MindFlowError::TaskNotFound { id: task_id });
        }
        Ok(subtask)
    }

    /// Flips a subtask between open and done; returns the stored state.
    pub async fn toggle_subtask(&self, task_id: Uuid, subtask_id: Uuid) -> Result<bool> {
        let mut task = self.get(task_id).await?;
        let completed = task.toggle_subtask(subtask_id).ok_or_else(|| {
            MindFlowError::validation("subtask", format!("no subtask {} on task {}", subtask_id, task_id))
        })?;

        let applied = ErrorContext::new("toggle_subtask")
            .with_detail("task_id", task_id)
            .with_detail("subtask_id", subtask_id)
            .wrap(self.store.set_subtask_completed(task_id, subtask_id, completed).await)?;
        if !applied {
            return Err(MindFlowError::TaskNotFound { id: task_id });
        }
        debug!(%task_id, %subtask_id, completed, "Subtask toggled");
        Ok(completed)
    }

    pub async fn get(&self, id: Uuid) -> Result<Task> {
        ErrorContext::new("get_task")
            .with_detail("task_id", id)
            .wrap(self.store.get_task(id).await)?
            .ok_or(MindFlowError::TaskNotFound { id })
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = ErrorContext::new("delete_task")
            .with_detail("task_id", id)
            .wrap(self.store.delete_task(id).await)?;
        LogHelper::log_task_operation("delete", id, deleted);
        if deleted {
            Ok(())
        } else {
            Err(MindFlowError::TaskNotFound { id })
        }
    }

    pub async fn list(&self, user: &UserId) -> Result<Vec<Task>> {
        ErrorContext::new("list_tasks")
            .with_detail("user", user)
            .wrap(self.store.list_tasks(user).await)
    }

    async fn ensure_category(&self, user: &UserId, category_id: Uuid) -> Result<()> {
        let categories = ErrorContext::new("list_categories")
            .with_detail("user", user)
            .wrap(self.store.list_categories(user).await)?;
        if categories.iter().any(|c| c.id == category_id) {
            Ok(())
        } else {
            Err(MindFlowError::CategoryNotFound { id: category_id })
        }
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(MindFlowError::validation("title", "must not be empty"));
    }
    Ok(())
}
