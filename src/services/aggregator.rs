use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::calendar::CalendarDay;
use crate::domain::category::Category;
use crate::domain::day_view::{CategoryBranch, DayView};
use crate::domain::task::Task;

/// Projects the full task and category collections onto one calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskAggregator;

impl TaskAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Groups the tasks due on `date` under their categories.
    ///
    /// Categories keep the order of `categories`; tasks within a category are
    /// ordered by creation time (then id), so identical input always yields
    /// an identical view regardless of the order tasks arrive in. Categories
    /// without a task on `date` are left out. Tasks whose category does not
    /// resolve are dropped and logged, and a repeated task id is kept once.
    pub fn build_day_view(&self, tasks: &[Task], categories: &[Category], date: impl CalendarDay) -> DayView {
        let day = date.calendar_day();

        let mut slots: HashMap<Uuid, usize> = HashMap::with_capacity(categories.len());
        for (index, category) in categories.iter().enumerate() {
            slots.entry(category.id).or_insert(index);
        }

        let mut buckets: Vec<Vec<Task>> = vec![Vec::new(); categories.len()];
        let mut seen: HashSet<Uuid> = HashSet::new();
        let mut unresolved = 0usize;

        for task in tasks.iter().filter(|t| t.is_due_on(day)) {
            let Some(&slot) = task.category_id.as_ref().and_then(|id| slots.get(id)) else {
                unresolved += 1;
                warn!(
                    task_id = %task.id,
                    category_id = ?task.category_id,
                    "Task has no resolvable category; leaving it out of the day view"
                );
                continue;
            };
            if seen.insert(task.id) {
                buckets[slot].push(task.clone());
            }
        }

        for bucket in &mut buckets {
            bucket.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        }

        let branches: Vec<CategoryBranch> = categories
            .iter()
            .zip(buckets)
            .filter(|(_, tasks)| !tasks.is_empty())
            .map(|(category, tasks)| CategoryBranch {
                category: category.clone(),
                tasks,
            })
            .collect();

        debug!(
            %day,
            categories = branches.len(),
            tasks = seen.len(),
            unresolved,
            "Built day view"
        );

        DayView {
            date: day,
            categories: branches,
        }
    }

    /// Open tasks due strictly before `as_of`, in input order.
    ///
    /// Only selects; applying the rollover is up to the caller.
    pub fn find_rollover_candidates<'a>(&self, tasks: &'a [Task], as_of: impl CalendarDay) -> Vec<&'a Task> {
        let day = as_of.calendar_day();
        tasks.iter().filter(|t| t.is_overdue(day)).collect()
    }
}
