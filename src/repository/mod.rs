pub mod category_repository;
pub mod database;
pub mod task_repository;

use anyhow::{Result, bail};
use async_trait::async_trait;
use mockall::automock;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::category::{Category, CategoryUpdate};
use crate::domain::task::{SubTask, Task, TaskUpdate};
use crate::domain::user::UserId;

/// Data layer the mind map reads from and mutations are sent through.
///
/// Listing returns a snapshot; callers re-list (or republish through
/// `SnapshotFeed`) after a mutation to observe it.
#[automock]
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_tasks(&self, user: &UserId) -> Result<Vec<Task>>;

    async fn list_categories(&self, user: &UserId) -> Result<Vec<Category>>;

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>>;

    async fn create_task(&self, user: &UserId, task: &Task) -> Result<()>;

    /// Returns `false` when no task has that id. Moving a task into a
    /// category owned by someone else is an error.
    async fn update_task(&self, id: Uuid, update: TaskUpdate) -> Result<bool>;

    async fn delete_task(&self, id: Uuid) -> Result<bool>;

    /// Returns `false` when no task has that id.
    async fn add_subtask(&self, task_id: Uuid, subtask: &SubTask) -> Result<bool>;

    /// Returns `false` when the task has no such subtask.
    async fn set_subtask_completed(&self, task_id: Uuid, subtask_id: Uuid, completed: bool) -> Result<bool>;

    async fn add_category(&self, user: &UserId, name: &str, color: &str) -> Result<Uuid>;

    async fn update_category(&self, id: Uuid, update: CategoryUpdate) -> Result<bool>;

    /// Deletes the category and every task filed under it, returning how
    /// many tasks went with it.
    async fn delete_category(&self, id: Uuid) -> Result<usize>;
}

#[derive(Clone)]
pub struct Repository {
    pub pool: Arc<SqlitePool>,
    pub tasks: task_repository::TaskRepository,
    pub categories: category_repository::CategoryRepository,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        let pool = Arc::new(pool);
        Self {
            tasks: task_repository::TaskRepository::new(pool.clone()),
            categories: category_repository::CategoryRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn seed_default_categories(&self, user: &UserId) -> Result<usize> {
        self.categories.seed_defaults(user).await
    }
}

#[async_trait]
impl TaskStore for Repository {
    async fn list_tasks(&self, user: &UserId) -> Result<Vec<Task>> {
        self.tasks.list_for_user(user).await
    }

    async fn list_categories(&self, user: &UserId) -> Result<Vec<Category>> {
        self.categories.list_for_user(user).await
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>> {
        self.tasks.get(id).await
    }

    async fn create_task(&self, user: &UserId, task: &Task) -> Result<()> {
        if let Some(category_id) = task.category_id {
            match self.categories.owner_of(category_id).await? {
                Some(owner) if &owner == user => {}
                _ => bail!("Category {} is not owned by {}", category_id, user),
            }
        }
        self.tasks.create(user, task).await
    }

    async fn update_task(&self, id: Uuid, update: TaskUpdate) -> Result<bool> {
        if let Some(Some(category_id)) = update.category_id {
            let Some(task_owner) = self.tasks.owner_of(id).await? else {
                return Ok(false);
            };
            if self.categories.owner_of(category_id).await?.as_ref() != Some(&task_owner) {
                bail!("Category {} is not owned by {}", category_id, task_owner);
            }
        }
        self.tasks.update(id, &update).await
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool> {
        self.tasks.delete(id).await
    }

    async fn add_subtask(&self, task_id: Uuid, subtask: &SubTask) -> Result<bool> {
        self.tasks.add_subtask(task_id, subtask).await
    }

    async fn set_subtask_completed(&self, task_id: Uuid, subtask_id: Uuid, completed: bool) -> Result<bool> {
        self.tasks.set_subtask_completed(task_id, subtask_id, completed).await
    }

    async fn add_category(&self, user: &UserId, name: &str, color: &str) -> Result<Uuid> {
        let category = Category::new(name.trim(), color);
        self.categories.create(user, &category).await?;
        Ok(category.id)
    }

    async fn update_category(&self, id: Uuid, update: CategoryUpdate) -> Result<bool> {
        self.categories.update(id, &update).await
    }

    async fn delete_category(&self, id: Uuid) -> Result<usize> {
        self.categories.delete(id).await
    }
}
