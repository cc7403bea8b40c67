// Test helpers for integration testing

use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::category::Category;
use crate::domain::user::UserId;
use crate::repository::database::init_test_database;
use crate::repository::{Repository, TaskStore};

pub struct TestContext {
    pub repository: Arc<Repository>,
    pub user: UserId,
}

impl TestContext {
    /// Fresh in-memory store with the default categories seeded for `tester`.
    pub async fn new_for_test() -> Result<Self> {
        let repository = Arc::new(Repository::new(init_test_database().await?));
        let user = UserId::new("tester");
        repository.seed_default_categories(&user).await?;
        Ok(Self { repository, user })
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.repository.list_categories(&self.user).await
    }

    pub async fn category_named(&self, name: &str) -> Result<Category> {
        self.categories()
            .await?
            .into_iter()
            .find(|c| c.has_name(name))
            .ok_or_else(|| anyhow::anyhow!("no category named {}", name))
    }
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
