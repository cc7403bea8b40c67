use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::category::{Category, CategoryUpdate, default_categories};
use crate::domain::user::UserId;

#[derive(Clone)]
pub struct CategoryRepository {
    pool: Arc<SqlitePool>,
}

impl CategoryRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &UserId, category: &Category) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, user_id, name, color, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(category.id.to_string())
        .bind(user.as_str())
        .bind(&category.name)
        .bind(&category.color)
        .bind(category.created_at.to_rfc3339())
        .execute(self.pool.as_ref())
        .await
        .with_context(|| format!("Failed to insert category '{}'", category.name))?;

        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name, color, created_at FROM categories WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.as_ref().map(row_to_category).transpose()
    }

    /// Categories of `user` in creation order.
    pub async fn list_for_user(&self, user: &UserId) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, color, created_at FROM categories
            WHERE user_id = ?
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(user.as_str())
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut categories = Vec::with_capacity(rows.len());
        for row in &rows {
            match row_to_category(row) {
                Ok(category) => categories.push(category),
                Err(e) => warn!(error = %e, "Skipping unreadable category row"),
            }
        }
        Ok(categories)
    }

    pub async fn find_by_name(&self, user: &UserId, name: &str) -> Result<Option<Category>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, color, created_at FROM categories
            WHERE user_id = ? AND name = ? COLLATE NOCASE
            "#,
        )
        .bind(user.as_str())
        .bind(name.trim())
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.as_ref().map(row_to_category).transpose()
    }

    /// Returns the owner of a category, if it exists.
    pub async fn owner_of(&self, id: Uuid) -> Result<Option<UserId>> {
        let owner: Option<String> = sqlx::query_scalar("SELECT user_id FROM categories WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.pool.as_ref())
            .await?;
        Ok(owner.map(UserId::new))
    }

    pub async fn update(&self, id: Uuid, update: &CategoryUpdate) -> Result<bool> {
        let Some(mut category) = self.get(id).await? else {
            return Ok(false);
        };
        category.apply(update);

        sqlx::query("UPDATE categories SET name = ?, color = ? WHERE id = ?")
            .bind(&category.name)
            .bind(&category.color)
            .bind(id.to_string())
            .execute(self.pool.as_ref())
            .await
            .with_context(|| format!("Failed to update category {}", id))?;

        Ok(true)
    }

    /// Deletes a category together with every task filed under it. Returns
    /// the number of tasks removed.
    pub async fn delete(&self, id: Uuid) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        let tasks = sqlx::query("DELETE FROM tasks WHERE category_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let removed = tasks.rows_affected() as usize;
        info!(category_id = %id, tasks_removed = removed, "Category deleted");
        Ok(removed)
    }

    /// Inserts the default category set when `user` has no categories yet.
    pub async fn seed_defaults(&self, user: &UserId) -> Result<usize> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE user_id = ?")
            .bind(user.as_str())
            .fetch_one(self.pool.as_ref())
            .await?;
        if existing > 0 {
            return Ok(0);
        }

        let defaults = default_categories();
        for category in &defaults {
            self.create(user, category).await?;
        }

        info!(user = %user, count = defaults.len(), "Seeded default categories");
        Ok(defaults.len())
    }
}

fn row_to_category(row: &SqliteRow) -> Result<Category> {
    Ok(Category {
        id: Uuid::parse_str(row.get("id"))?,
        name: row.get("name"),
        color: row.get("color"),
        created_at: DateTime::parse_from_rfc3339(row.get("created_at"))?.with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::Task;
    use crate::repository::database::init_test_database;
    use crate::repository::task_repository::TaskRepository;
    use chrono::NaiveDate;

    async fn setup() -> (CategoryRepository, TaskRepository, UserId) {
        let pool = Arc::new(init_test_database().await.unwrap());
        (
            CategoryRepository::new(pool.clone()),
            TaskRepository::new(pool),
            UserId::new("tester"),
        )
    }

    #[tokio::test]
    async fn test_seed_defaults_once() {
        let (repo, _, user) = setup().await;

        assert_eq!(repo.seed_defaults(&user).await.unwrap(), 6);
        assert_eq!(repo.seed_defaults(&user).await.unwrap(), 0);

        let names: Vec<_> = repo
            .list_for_user(&user)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Work", "Personal", "Health", "Finance", "Learning", "Projects"]);
    }

    #[tokio::test]
    async fn test_names_unique_per_user_ignoring_case() {
        let (repo, _, user) = setup().await;
        repo.create(&user, &Category::new("Work", "#a78bfa")).await.unwrap();

        let duplicate = repo.create(&user, &Category::new("WORK", "#000000")).await;
        assert!(duplicate.is_err());

        let other = UserId::new("other");
        assert!(repo.create(&other, &Category::new("work", "#000000")).await.is_ok());

        let found = repo.find_by_name(&user, "wOrK").await.unwrap().unwrap();
        assert_eq!(found.name, "Work");
    }

    #[tokio::test]
    async fn test_update_category() {
        let (repo, _, user) = setup().await;
        let category = Category::new("Work", "#a78bfa");
        repo.create(&user, &category).await.unwrap();

        let update = CategoryUpdate {
            name: Some("Office".to_string()),
            color: Some("#123456".to_string()),
        };
        assert!(repo.update(category.id, &update).await.unwrap());
        assert!(!repo.update(Uuid::new_v4(), &update).await.unwrap());

        let fetched = repo.get(category.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Office");
        assert_eq!(fetched.color, "#123456");
        assert_eq!(repo.owner_of(category.id).await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_tasks() {
        let (repo, tasks, user) = setup().await;
        let work = Category::new("Work", "#a78bfa");
        let health = Category::new("Health", "#4ade80");
        repo.create(&user, &work).await.unwrap();
        repo.create(&user, &health).await.unwrap();

        let due = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        tasks.create(&user, &Task::new("Report", due).with_category(work.id)).await.unwrap();
        tasks.create(&user, &Task::new("Email", due).with_category(work.id)).await.unwrap();
        tasks.create(&user, &Task::new("Run", due).with_category(health.id)).await.unwrap();

        assert_eq!(repo.delete(work.id).await.unwrap(), 2);

        let remaining = tasks.list_for_user(&user).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Run");
        assert!(repo.get(work.id).await.unwrap().is_none());
    }
}
