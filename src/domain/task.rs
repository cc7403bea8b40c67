use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calendar::CalendarDay;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// How many times the due date was carried forward because the task was
    /// still open when its day ended. Never decreases.
    pub rollover_count: u32,
    pub subtasks: Vec<SubTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubTask {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl SubTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            completed: false,
        }
    }
}

impl Task {
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            category_id: None,
            status: TaskStatus::Active,
            priority: Priority::Medium,
            due_date,
            created_at: Utc::now(),
            completed_at: None,
            rollover_count: 0,
            subtasks: Vec::new(),
        }
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(now);
    }

    pub fn reopen(&mut self) {
        self.status = TaskStatus::Active;
        self.completed_at = None;
    }

    pub fn is_due_on(&self, day: impl CalendarDay) -> bool {
        self.due_date == day.calendar_day()
    }

    /// Open and due strictly before `as_of`. A task due on `as_of` itself is
    /// not overdue.
    pub fn is_overdue(&self, as_of: impl CalendarDay) -> bool {
        !self.is_completed() && self.due_date < as_of.calendar_day()
    }

    pub fn has_rolled_over(&self) -> bool {
        self.rollover_count > 0
    }

    pub fn add_subtask(&mut self, title: impl Into<String>) -> Uuid {
        let subtask = SubTask::new(title);
        let id = subtask.id;
        self.subtasks.push(subtask);
        id
    }

    pub fn subtask(&self, subtask_id: Uuid) -> Option<&SubTask> {
        self.subtasks.iter().find(|s| s.id == subtask_id)
    }

    /// Flips a subtask's completion and returns the new state, or `None` if
    /// the task has no such subtask.
    pub fn toggle_subtask(&mut self, subtask_id: Uuid) -> Option<bool> {
        let subtask = self.subtasks.iter_mut().find(|s| s.id == subtask_id)?;
        subtask.completed = !subtask.completed;
        Some(subtask.completed)
    }

    pub fn subtask_progress(&self) -> (usize, usize) {
        let total = self.subtasks.len();
        let completed = self.subtasks.iter().filter(|s| s.completed).count();
        (completed, total)
    }

    pub fn apply(&mut self, update: &TaskUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(completed_at) = update.completed_at {
            self.completed_at = completed_at;
        }
        if let Some(count) = update.rollover_count {
            self.rollover_count = self.rollover_count.max(count);
        }
        match self.status {
            TaskStatus::Active => self.completed_at = None,
            TaskStatus::Completed if self.completed_at.is_none() => self.completed_at = Some(Utc::now()),
            TaskStatus::Completed => {}
        }
    }
}

/// Partial set of task fields, as accepted by `TaskStore::update_task`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<Uuid>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    pub rollover_count: Option<u32>,
}

impl TaskUpdate {
    pub fn complete(now: DateTime<Utc>) -> Self {
        Self {
            status: Some(TaskStatus::Completed),
            completed_at: Some(Some(now)),
            ..Default::default()
        }
    }

    pub fn reopen() -> Self {
        Self {
            status: Some(TaskStatus::Active),
            completed_at: Some(None),
            ..Default::default()
        }
    }

    /// Moves `task` to `as_of` and bumps its rollover counter.
    pub fn rollover(task: &Task, as_of: impl CalendarDay) -> Self {
        Self {
            due_date: Some(as_of.calendar_day()),
            rollover_count: Some(task.rollover_count.saturating_add(1)),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
