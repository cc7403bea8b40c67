use chrono::{Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use mindflow::domain::category::Category;
use mindflow::domain::task::Task;
use mindflow::services::TaskAggregator;
use mindflow::test_helpers::day;
use rand::seq::SliceRandom;
use rstest::rstest;
use uuid::Uuid;

fn work() -> Category {
    Category::new("Work", "#a78bfa")
}

fn health() -> Category {
    Category::new("Health", "#4ade80")
}

#[test]
fn scenario_work_task_on_its_day_only() {
    let work = work();
    let health = health();
    let t1 = Task::new("Task 1", day(2024, 5, 1)).with_category(work.id);
    let t2 = Task::new("Task 2", day(2024, 5, 2)).with_category(health.id);

    let view = TaskAggregator::new().build_day_view(
        &[t1.clone(), t2],
        &[work.clone(), health],
        day(2024, 5, 1),
    );

    assert_eq!(view.categories.len(), 1);
    assert_eq!(view.categories[0].category.id, work.id);
    assert_eq!(view.categories[0].category.color, "#a78bfa");
    assert_eq!(view.categories[0].tasks.len(), 1);
    assert_eq!(view.categories[0].tasks[0].id, t1.id);
}

#[rstest]
#[case(day(2024, 4, 30), false)]
#[case(day(2024, 5, 1), true)]
#[case(day(2024, 5, 2), false)]
fn membership_is_by_calendar_day(#[case] due: NaiveDate, #[case] included: bool) {
    let work = work();
    let task = Task::new("Report", due).with_category(work.id);

    let view = TaskAggregator::new().build_day_view(&[task], &[work], day(2024, 5, 1));
    assert_eq!(view.task_count() == 1, included);
}

#[test]
fn zoned_date_uses_its_own_calendar_day() {
    let work = work();
    let task = Task::new("Report", day(2024, 5, 1)).with_category(work.id);

    // 23:30 on May 1 in UTC-5 is already May 2 in UTC.
    let zone = FixedOffset::west_opt(5 * 3600).unwrap();
    let late_evening = zone.with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap();
    assert_eq!(late_evening.with_timezone(&Utc).date_naive(), day(2024, 5, 2));

    let view = TaskAggregator::new().build_day_view(&[task], &[work], late_evening);
    assert_eq!(view.task_count(), 1);
}

#[test]
fn includes_exactly_tasks_due_with_resolvable_category() {
    let categories = vec![work(), health()];
    let target = day(2024, 5, 1);
    let mut rng = rand::thread_rng();

    let mut tasks = Vec::new();
    for i in 0..60 {
        let due = target + Duration::days((i % 3) - 1);
        let category_id = match i % 4 {
            0 => None,
            1 => Some(Uuid::new_v4()),
            2 => Some(categories[0].id),
            _ => Some(categories[1].id),
        };
        let mut task = Task::new(format!("Task {i}"), due);
        task.category_id = category_id;
        tasks.push(task);
    }
    tasks.shuffle(&mut rng);

    let view = TaskAggregator::new().build_day_view(&tasks, &categories, target);

    let expected: Vec<Uuid> = {
        let mut ids: Vec<Uuid> = tasks
            .iter()
            .filter(|t| t.due_date == target)
            .filter(|t| t.category_id.is_some_and(|id| categories.iter().any(|c| c.id == id)))
            .map(|t| t.id)
            .collect();
        ids.sort();
        ids
    };
    let mut actual: Vec<Uuid> = view.tasks().map(|t| t.id).collect();
    actual.sort();
    assert_eq!(actual, expected);

    for branch in &view.categories {
        assert!(!branch.tasks.is_empty());
        assert!(branch.tasks.iter().all(|t| t.category_id == Some(branch.category.id)));
        assert!(branch.tasks.iter().all(|t| t.due_date == view.date));
    }
}

#[test]
fn categories_keep_input_order() {
    let categories = vec![health(), work()];
    let tasks = vec![
        Task::new("Report", day(2024, 5, 1)).with_category(categories[1].id),
        Task::new("Run", day(2024, 5, 1)).with_category(categories[0].id),
    ];

    let view = TaskAggregator::new().build_day_view(&tasks, &categories, day(2024, 5, 1));
    let names: Vec<&str> = view.categories.iter().map(|b| b.category.name.as_str()).collect();
    assert_eq!(names, ["Health", "Work"]);
}

#[test]
fn repeated_builds_are_identical() {
    let categories = vec![work(), health()];
    let base = Utc::now();
    let mut tasks: Vec<Task> = (0..20)
        .map(|i| {
            let mut task = Task::new(format!("Task {i}"), day(2024, 5, 1)).with_category(categories[i % 2].id);
            task.created_at = base - Duration::minutes(i as i64 % 5);
            task
        })
        .collect();

    let aggregator = TaskAggregator::new();
    let first = aggregator.build_day_view(&tasks, &categories, day(2024, 5, 1));
    let second = aggregator.build_day_view(&tasks, &categories, day(2024, 5, 1));
    assert_eq!(first, second);

    tasks.reverse();
    let reversed = aggregator.build_day_view(&tasks, &categories, day(2024, 5, 1));
    assert_eq!(first, reversed);
}

#[test]
fn empty_input_is_an_empty_view() {
    let view = TaskAggregator::new().build_day_view(&[], &[work()], day(2024, 5, 1));
    assert!(view.is_empty());
    assert_eq!(view.date, day(2024, 5, 1));
}
