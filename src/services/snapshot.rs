use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

use super::aggregator::TaskAggregator;
use super::error_handling::{ErrorContext, Result};
use crate::domain::calendar::CalendarDay;
use crate::domain::category::Category;
use crate::domain::day_view::DayView;
use crate::domain::task::Task;
use crate::domain::user::UserId;
use crate::repository::TaskStore;

/// Everything the mind map needs from the data layer at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSnapshot {
    pub tasks: Vec<Task>,
    pub categories: Vec<Category>,
}

impl DataSnapshot {
    pub fn day_view(&self, date: impl CalendarDay) -> DayView {
        TaskAggregator::new().build_day_view(&self.tasks, &self.categories, date)
    }
}

pub type SnapshotReceiver = watch::Receiver<Option<Arc<DataSnapshot>>>;

/// Publishes data snapshots to subscribers.
///
/// `None` means nothing has loaded yet. Refreshes may overlap; a snapshot is
/// only published if no later-started refresh has published already, so the
/// most recently requested data always ends up visible.
pub struct SnapshotFeed {
    sender: watch::Sender<Option<Arc<DataSnapshot>>>,
    issued: AtomicU64,
    published: Mutex<u64>,
}

impl SnapshotFeed {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender,
            issued: AtomicU64::new(0),
            published: Mutex::new(0),
        }
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.sender.subscribe()
    }

    pub fn current(&self) -> Option<Arc<DataSnapshot>> {
        self.sender.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.sender.borrow().is_none()
    }

    /// Loads tasks and categories for `user` and publishes them.
    ///
    /// On failure the previously published value stays in place.
    pub async fn refresh(&self, store: &dyn TaskStore, user: &UserId) -> Result<Arc<DataSnapshot>> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let (tasks, categories) = ErrorContext::new("refresh_snapshot")
            .with_detail("user", user)
            .wrap(tokio::try_join!(store.list_tasks(user), store.list_categories(user)))?;

        let snapshot = Arc::new(DataSnapshot { tasks, categories });
        self.publish(ticket, snapshot.clone());
        Ok(snapshot)
    }

    fn publish(&self, ticket: u64, snapshot: Arc<DataSnapshot>) -> bool {
        let mut published = self.published.lock();
        if ticket <= *published {
            debug!(ticket, latest = *published, "Discarding stale snapshot");
            return false;
        }
        *published = ticket;
        self.sender.send_replace(Some(snapshot));
        true
    }
}

impl Default for SnapshotFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockTaskStore;
    use crate::services::error_handling::MindFlowError;
    use chrono::NaiveDate;

    fn snapshot_with(title: &str) -> Arc<DataSnapshot> {
        let due = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        Arc::new(DataSnapshot {
            tasks: vec![Task::new(title, due)],
            categories: vec![],
        })
    }

    #[test]
    fn test_starts_loading() {
        let feed = SnapshotFeed::new();
        assert!(feed.is_loading());
        assert!(feed.current().is_none());
    }

    #[test]
    fn test_stale_publish_is_discarded() {
        let feed = SnapshotFeed::new();
        assert!(feed.publish(2, snapshot_with("newer")));
        assert!(!feed.publish(1, snapshot_with("older")));

        let current = feed.current().unwrap();
        assert_eq!(current.tasks[0].title, "newer");
    }

    #[tokio::test]
    async fn test_refresh_notifies_subscribers() {
        let category = Category::new("Work", "#a78bfa");
        let due = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let task = Task::new("Report", due).with_category(category.id);

        let mut store = MockTaskStore::new();
        let tasks = vec![task.clone()];
        store.expect_list_tasks().returning(move |_| Ok(tasks.clone()));
        let categories = vec![category.clone()];
        store
            .expect_list_categories()
            .returning(move |_| Ok(categories.clone()));

        let feed = SnapshotFeed::new();
        let mut receiver = feed.subscribe();
        feed.refresh(&store, &UserId::new("u")).await.unwrap();

        assert!(receiver.has_changed().unwrap());
        let snapshot = receiver.borrow_and_update().clone().unwrap();
        let view = snapshot.day_view(due);
        assert_eq!(view.task_count(), 1);
        assert_eq!(view.categories[0].category.id, category.id);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_value() {
        let feed = SnapshotFeed::new();
        feed.publish(1, snapshot_with("kept"));
        feed.issued.store(1, Ordering::SeqCst);

        let mut store = MockTaskStore::new();
        store
            .expect_list_tasks()
            .returning(|_| Err(anyhow::anyhow!("offline")));
        store.expect_list_categories().returning(|_| Ok(vec![]));

        let result = feed.refresh(&store, &UserId::new("u")).await;
        assert!(matches!(result, Err(MindFlowError::DatabaseError { .. })));
        assert_eq!(feed.current().unwrap().tasks[0].title, "kept");
    }
}
