use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use super::task::Task;

/// Tasks due on one calendar day, grouped under their categories.
///
/// Derived on demand and never stored. Every branch holds at least one task,
/// and every task is due on `date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayView {
    pub date: NaiveDate,
    pub categories: Vec<CategoryBranch>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryBranch {
    pub category: Category,
    pub tasks: Vec<Task>,
}

impl DayView {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            categories: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.categories.iter().map(|b| b.tasks.len()).sum()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks().filter(|t| t.is_completed()).count()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.categories.iter().flat_map(|b| b.tasks.iter())
    }

    pub fn find_task(&self, id: Uuid) -> Option<&Task> {
        self.tasks().find(|t| t.id == id)
    }
}
