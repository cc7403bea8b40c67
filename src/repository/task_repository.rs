use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, Sqlite, SqlitePool, Transaction, sqlite::SqliteRow};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::domain::calendar::{format_calendar_day, parse_calendar_day};
use crate::domain::task::{Priority, SubTask, Task, TaskStatus, TaskUpdate};
use crate::domain::user::UserId;

const TASK_COLUMNS: &str = r#"
    id, title, description, category_id, status, priority,
    due_date, created_at, completed_at, rollover_count
"#;

#[derive(Clone)]
pub struct TaskRepository {
    pool: Arc<SqlitePool>,
}

impl TaskRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &UserId, task: &Task) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, user_id, title, description, category_id, status, priority,
                due_date, created_at, completed_at, rollover_count
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(task.id.to_string())
        .bind(user.as_str())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.category_id.map(|id| id.to_string()))
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(format_calendar_day(task.due_date))
        .bind(task.created_at.to_rfc3339())
        .bind(task.completed_at.map(|d| d.to_rfc3339()))
        .bind(i64::from(task.rollover_count))
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to insert task {}", task.id))?;

        insert_subtasks(&mut tx, task).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(self.pool.as_ref())
            .await?;

        match row {
            Some(row) => {
                let mut task = row_to_task(&row)?;
                task.subtasks = self.subtasks_for(&[task.id]).await?.remove(&task.id).unwrap_or_default();
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }

    /// All tasks owned by `user`, newest first. Rows that cannot be decoded
    /// are skipped with a warning rather than failing the whole listing.
    pub async fn list_for_user(&self, user: &UserId) -> Result<Vec<Task>> {
        let rows = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ? ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(user.as_str())
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut tasks = Vec::with_capacity(rows.len());
        for row in &rows {
            match row_to_task(row) {
                Ok(task) => tasks.push(task),
                Err(e) => {
                    let id: String = row.try_get("id").unwrap_or_default();
                    warn!(task_id = %id, error = %e, "Skipping unreadable task row");
                }
            }
        }

        let ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();
        let mut subtasks = self.subtasks_for(&ids).await?;
        for task in &mut tasks {
            task.subtasks = subtasks.remove(&task.id).unwrap_or_default();
        }

        Ok(tasks)
    }

    /// Applies a partial update. Returns `false` when the task does not exist.
    pub async fn update(&self, id: Uuid, update: &TaskUpdate) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(false);
        };

        let mut task = row_to_task(&row)?;
        task.apply(update);

        sqlx::query(
            r#"
            UPDATE tasks SET
                title = ?, description = ?, category_id = ?, status = ?, priority = ?,
                due_date = ?, completed_at = ?, rollover_count = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.category_id.map(|id| id.to_string()))
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(format_calendar_day(task.due_date))
        .bind(task.completed_at.map(|d| d.to_rfc3339()))
        .bind(i64::from(task.rollover_count))
        .bind(task.id.to_string())
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to update task {}", id))?;

        tx.commit().await?;
        Ok(true)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        // Subtasks cascade
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn owner_of(&self, id: Uuid) -> Result<Option<UserId>> {
        let owner: Option<String> = sqlx::query_scalar("SELECT user_id FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.pool.as_ref())
            .await?;
        Ok(owner.map(UserId::new))
    }

    /// Appends a subtask after the existing ones. Returns `false` when the
    /// task does not exist.
    pub async fn add_subtask(&self, task_id: Uuid, subtask: &SubTask) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM tasks WHERE id = ?")
            .bind(task_id.to_string())
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(false);
        }

        let position: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subtasks WHERE task_id = ?")
            .bind(task_id.to_string())
            .fetch_one(&mut *tx)
            .await?;
        insert_subtask(&mut tx, task_id, subtask, position).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Returns `false` when `task_id` has no subtask `subtask_id`.
    pub async fn set_subtask_completed(&self, task_id: Uuid, subtask_id: Uuid, completed: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE subtasks SET completed = ? WHERE id = ? AND task_id = ?")
            .bind(completed as i64)
            .bind(subtask_id.to_string())
            .bind(task_id.to_string())
            .execute(self.pool.as_ref())
            .await
            .with_context(|| format!("Failed to update subtask {}", subtask_id))?;

        Ok(result.rows_affected() > 0)
    }

    async fn subtasks_for(&self, task_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<SubTask>>> {
        let mut grouped: HashMap<Uuid, Vec<SubTask>> = HashMap::new();
        if task_ids.is_empty() {
            return Ok(grouped);
        }

        let placeholders = vec!["?"; task_ids.len()].join(", ");
        let sql = format!(
            "SELECT id, task_id, title, completed FROM subtasks WHERE task_id IN ({placeholders}) ORDER BY position"
        );
        let mut query = sqlx::query(&sql);
        for id in task_ids {
            query = query.bind(id.to_string());
        }

        for row in query.fetch_all(self.pool.as_ref()).await? {
            let task_id = Uuid::parse_str(row.get("task_id"))?;
            grouped.entry(task_id).or_default().push(SubTask {
                id: Uuid::parse_str(row.get("id"))?,
                title: row.get("title"),
                completed: row.get::<i64, _>("completed") != 0,
            });
        }

        Ok(grouped)
    }
}

async fn insert_subtasks(tx: &mut Transaction<'_, Sqlite>, task: &Task) -> Result<()> {
    for (position, subtask) in task.subtasks.iter().enumerate() {
        insert_subtask(tx, task.id, subtask, position as i64).await?;
    }
    Ok(())
}

async fn insert_subtask(
    tx: &mut Transaction<'_, Sqlite>,
    task_id: Uuid,
    subtask: &SubTask,
    position: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO subtasks (id, task_id, title, completed, position)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(subtask.id.to_string())
    .bind(task_id.to_string())
    .bind(&subtask.title)
    .bind(subtask.completed as i64)
    .bind(position)
    .execute(&mut **tx)
    .await
    .with_context(|| format!("Failed to insert subtask {}", subtask.id))?;
    Ok(())
}

fn row_to_task(row: &SqliteRow) -> Result<Task> {
    let id = Uuid::parse_str(row.get("id"))?;
    let raw_due: String = row.get("due_date");
    let due_date = parse_calendar_day(&raw_due)
        .ok_or_else(|| anyhow::anyhow!("Invalid due date '{}' on task {}", raw_due, id))?;
    let raw_status: String = row.get("status");
    let raw_priority: String = row.get("priority");

    Ok(Task {
        id,
        title: row.get("title"),
        description: row.get("description"),
        category_id: row
            .get::<Option<String>, _>("category_id")
            .and_then(|s| Uuid::parse_str(&s).ok()),
        status: TaskStatus::parse(&raw_status)
            .ok_or_else(|| anyhow::anyhow!("Invalid task status: {}", raw_status))?,
        priority: Priority::parse(&raw_priority)
            .ok_or_else(|| anyhow::anyhow!("Invalid priority: {}", raw_priority))?,
        due_date,
        created_at: DateTime::parse_from_rfc3339(row.get("created_at"))?.with_timezone(&Utc),
        completed_at: row
            .get::<Option<String>, _>("completed_at")
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)),
        rollover_count: u32::try_from(row.get::<i64, _>("rollover_count").max(0)).unwrap_or(u32::MAX),
        subtasks: Vec::new(), // Filled separately
    })
}
