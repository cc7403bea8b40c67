use std::sync::Arc;
use tracing::{info, instrument};

use super::aggregator::TaskAggregator;
use super::error_handling::{ErrorContext, LogHelper, Result};
use crate::domain::calendar::CalendarDay;
use crate::domain::task::TaskUpdate;
use crate::domain::user::UserId;
use crate::repository::TaskStore;

/// Carries open tasks from past days forward to the current day.
#[derive(Clone)]
pub struct RolloverService {
    store: Arc<dyn TaskStore>,
    aggregator: TaskAggregator,
}

impl RolloverService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            aggregator: TaskAggregator::new(),
        }
    }

    /// Moves every overdue open task of `user` to `as_of`, bumping its
    /// rollover count. Returns how many tasks were moved.
    #[instrument(skip(self, user, as_of), fields(user = %user))]
    pub async fn roll_over(&self, user: &UserId, as_of: impl CalendarDay + Send) -> Result<usize> {
        let day = as_of.calendar_day();
        let tasks = ErrorContext::new("list_tasks")
            .with_detail("user", user)
            .wrap(self.store.list_tasks(user).await)?;

        let candidates = self.aggregator.find_rollover_candidates(&tasks, day);
        let mut rolled = 0;
        for task in candidates {
            let applied = ErrorContext::new("rollover_task")
                .with_detail("task_id", task.id)
                .wrap(self.store.update_task(task.id, TaskUpdate::rollover(task, day)).await)?;
            LogHelper::log_task_operation("rollover", task.id, applied);
            if applied {
                rolled += 1;
            }
        }

        if rolled > 0 {
            info!(count = rolled, %day, "Rolled over overdue tasks");
        }
        Ok(rolled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::Task;
    use crate::repository::MockTaskStore;
    use crate::services::error_handling::MindFlowError;
    use chrono::{NaiveDate, Utc};
    use mockall::predicate::eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_rolls_over_only_overdue_open_tasks() {
        let overdue = Task::new("Overdue", day(2024, 5, 1));
        let today = Task::new("Today", day(2024, 5, 3));
        let mut done = Task::new("Done", day(2024, 4, 1));
        done.complete(Utc::now());

        let listing = vec![overdue.clone(), today, done];
        let mut store = MockTaskStore::new();
        store
            .expect_list_tasks()
            .returning(move |_| Ok(listing.clone()));
        store
            .expect_update_task()
            .with(
                eq(overdue.id),
                eq(TaskUpdate {
                    due_date: Some(day(2024, 5, 3)),
                    rollover_count: Some(1),
                    ..Default::default()
                }),
            )
            .times(1)
            .returning(|_, _| Ok(true));

        let service = RolloverService::new(Arc::new(store));
        let rolled = service.roll_over(&UserId::new("u"), day(2024, 5, 3)).await.unwrap();
        assert_eq!(rolled, 1);
    }

    #[tokio::test]
    async fn test_update_failure_propagates() {
        let overdue = Task::new("Overdue", day(2024, 5, 1));
        let mut store = MockTaskStore::new();
        store
            .expect_list_tasks()
            .returning(move |_| Ok(vec![overdue.clone()]));
        store
            .expect_update_task()
            .returning(|_, _| Err(anyhow::anyhow!("write rejected")));

        let service = RolloverService::new(Arc::new(store));
        let result = service.roll_over(&UserId::new("u"), day(2024, 5, 3)).await;
        assert!(matches!(result, Err(MindFlowError::DatabaseError { .. })));
    }
}
