use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::error_handling::{ErrorContext, LogHelper, MindFlowError, Result};
use crate::domain::category::{Category, CategoryUpdate, is_valid_color};
use crate::domain::user::UserId;
use crate::repository::TaskStore;

const MAX_NAME_LEN: usize = 40;

/// Category management for one store. Names are unique per user, ignoring
/// case and surrounding whitespace.
#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn TaskStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, user: &UserId) -> Result<Vec<Category>> {
        ErrorContext::new("list_categories")
            .with_detail("user", user)
            .wrap(self.store.list_categories(user).await)
    }

    pub async fn add(&self, user: &UserId, name: &str, color: &str) -> Result<Uuid> {
        let name = validate_name(name)?;
        validate_color(color)?;

        let existing = self.list(user).await?;
        if existing.iter().any(|c| c.has_name(&name)) {
            return Err(MindFlowError::DuplicateCategory { name });
        }

        let id = ErrorContext::new("add_category")
            .with_detail("name", &name)
            .wrap(self.store.add_category(user, &name, color).await)?;
        info!(category_id = %id, %name, "Category added");
        Ok(id)
    }

    pub async fn rename(&self, user: &UserId, id: Uuid, name: &str) -> Result<()> {
        let name = validate_name(name)?;

        let existing = self.list(user).await?;
        if !existing.iter().any(|c| c.id == id) {
            return Err(MindFlowError::CategoryNotFound { id });
        }
        if existing.iter().any(|c| c.id != id && c.has_name(&name)) {
            return Err(MindFlowError::DuplicateCategory { name });
        }

        self.apply(
            id,
            CategoryUpdate {
                name: Some(name),
                color: None,
            },
        )
        .await
    }

    pub async fn recolor(&self, user: &UserId, id: Uuid, color: &str) -> Result<()> {
        validate_color(color)?;
        self.ensure_owned(user, id).await?;
        self.apply(
            id,
            CategoryUpdate {
                name: None,
                color: Some(color.to_string()),
            },
        )
        .await
    }

    /// Removes the category and its tasks; returns how many tasks were removed.
    pub async fn delete(&self, user: &UserId, id: Uuid) -> Result<usize> {
        self.ensure_owned(user, id).await?;

        ErrorContext::new("delete_category")
            .with_detail("category_id", id)
            .wrap(self.store.delete_category(id).await)
    }

    async fn ensure_owned(&self, user: &UserId, id: Uuid) -> Result<()> {
        if self.list(user).await?.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(MindFlowError::CategoryNotFound { id })
        }
    }

    async fn apply(&self, id: Uuid, update: CategoryUpdate) -> Result<()> {
        let applied = ErrorContext::new("update_category")
            .with_detail("category_id", id)
            .wrap(self.store.update_category(id, update).await)?;
        if applied {
            Ok(())
        } else {
            Err(MindFlowError::CategoryNotFound { id })
        }
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(MindFlowError::validation("name", "must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(MindFlowError::validation(
            "name",
            format!("must be at most {} characters", MAX_NAME_LEN),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_color(color: &str) -> Result<()> {
    if !is_valid_color(color) {
        LogHelper::log_validation_failure("color", color);
        return Err(MindFlowError::validation("color", "expected a hex colour like #a78bfa"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::Task;
    use crate::repository::Repository;
    use crate::repository::database::init_test_database;
    use chrono::NaiveDate;

    async fn setup() -> (CategoryService, Arc<Repository>, UserId) {
        let repository = Arc::new(Repository::new(init_test_database().await.unwrap()));
        (CategoryService::new(repository.clone()), repository, UserId::new("tester"))
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let (service, _, user) = setup().await;
        let id = service.add(&user, "  Garden ", "#22c55e").await.unwrap();

        let categories = service.list(&user).await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].id, id);
        assert_eq!(categories[0].name, "Garden");
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let (service, _, user) = setup().await;
        service.add(&user, "Work", "#a78bfa").await.unwrap();

        let result = service.add(&user, "work", "#000").await;
        assert!(matches!(result, Err(MindFlowError::DuplicateCategory { .. })));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let (service, _, user) = setup().await;
        assert!(matches!(
            service.add(&user, "", "#a78bfa").await,
            Err(MindFlowError::ValidationError { .. })
        ));
        assert!(matches!(
            service.add(&user, "Work", "purple").await,
            Err(MindFlowError::ValidationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_rename_and_recolor() {
        let (service, _, user) = setup().await;
        let work = service.add(&user, "Work", "#a78bfa").await.unwrap();
        service.add(&user, "Health", "#4ade80").await.unwrap();

        assert!(matches!(
            service.rename(&user, work, "HEALTH").await,
            Err(MindFlowError::DuplicateCategory { .. })
        ));
        // Renaming to its own name with different case is allowed.
        service.rename(&user, work, "WORK").await.unwrap();
        service.recolor(&user, work, "#fff").await.unwrap();

        let categories = service.list(&user).await.unwrap();
        let renamed = categories.iter().find(|c| c.id == work).unwrap();
        assert_eq!(renamed.name, "WORK");
        assert_eq!(renamed.color, "#fff");
    }

    #[tokio::test]
    async fn test_missing_category() {
        let (service, _, user) = setup().await;
        let id = Uuid::new_v4();
        assert!(matches!(
            service.rename(&user, id, "Other").await,
            Err(MindFlowError::CategoryNotFound { .. })
        ));
        assert!(matches!(
            service.recolor(&user, id, "#000000").await,
            Err(MindFlowError::CategoryNotFound { .. })
        ));
        assert!(matches!(
            service.delete(&user, id).await,
            Err(MindFlowError::CategoryNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_tasks() {
        let (service, repository, user) = setup().await;
        let work = service.add(&user, "Work", "#a78bfa").await.unwrap();
        let due = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        repository
            .create_task(&user, &Task::new("Report", due).with_category(work))
            .await
            .unwrap();

        assert_eq!(service.delete(&user, work).await.unwrap(), 1);
        assert!(repository.list_tasks(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_other_users_category_is_untouchable() {
        let (service, _, user) = setup().await;
        let other = UserId::new("other");
        let theirs = service.add(&other, "Secret", "#000000").await.unwrap();

        assert!(matches!(
            service.recolor(&user, theirs, "#ffffff").await,
            Err(MindFlowError::CategoryNotFound { .. })
        ));
        assert!(matches!(
            service.rename(&user, theirs, "Mine now").await,
            Err(MindFlowError::CategoryNotFound { .. })
        ));

        let unchanged = service.list(&other).await.unwrap();
        assert_eq!(unchanged[0].color, "#000000");
        assert_eq!(unchanged[0].name, "Secret");
    }
}
