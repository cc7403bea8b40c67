use chrono::NaiveDate;
use dioxus::prelude::*;

use super::mind_map::{active_transform, wheel_anchor, MindMap};
use crate::config::LayoutConfig;
use crate::domain::category::Category;
use crate::domain::task::{Priority, Task};
use crate::layout::scene::PLACEHOLDER_TEXT;
use crate::layout::{Point, ViewTransform, Viewport};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[component]
fn Harness(
    tasks: Vec<Task>,
    categories: Vec<Category>,
    loading: bool,
    date: NaiveDate,
    today: NaiveDate,
    width: f64,
    height: f64,
) -> Element {
    rsx! {
        MindMap {
            tasks,
            categories,
            loading,
            selected_date: date,
            today,
            on_task_selected: move |_| {},
            width,
            height,
        }
    }
}

fn render(props: HarnessProps) -> String {
    let mut dom = VirtualDom::new_with_props(Harness, props);
    dom.rebuild_in_place();
    dioxus_ssr::render(&dom)
}

fn sample() -> (Vec<Task>, Vec<Category>) {
    let work = Category::new("Work", "#a78bfa");
    let health = Category::new("Health", "#4ade80");

    let mut done = Task::new("Send invoices", day(2024, 5, 1)).with_category(work.id);
    done.complete(chrono::Utc::now());
    let urgent = Task::new("Prepare the quarterly planning deck", day(2024, 5, 1))
        .with_category(work.id)
        .with_priority(Priority::High);
    let mut run = Task::new("Morning run", day(2024, 5, 1))
        .with_category(health.id)
        .with_priority(Priority::Low);
    run.rollover_count = 2;
    let tomorrow = Task::new("Dentist", day(2024, 5, 2)).with_category(health.id);

    (vec![done, urgent, run, tomorrow], vec![work, health])
}

#[tokio::test]
async fn test_renders_full_structure() {
    let (tasks, categories) = sample();
    let html = render(HarnessProps {
        tasks,
        categories,
        loading: false,
        date: day(2024, 5, 1),
        today: day(2024, 5, 1),
        width: 1000.0,
        height: 800.0,
    });

    assert!(html.contains("TODAY"));
    assert!(html.contains("Work"));
    assert!(html.contains("Health"));
    assert!(html.contains("Morning run"));
    assert!(!html.contains("Dentist"), "tasks from other days stay hidden");

    assert!(html.contains("Prepare the quarterl…"));
    assert!(html.contains("line-through"));
    assert!(html.contains("badge badge-done"));
    assert!(html.contains("badge badge-high"));
    assert!(html.contains("↻ 2"));
    assert!(!html.contains(PLACEHOLDER_TEXT));
}

#[tokio::test]
async fn test_tooltip_holds_full_title_and_starts_hidden() {
    let (tasks, categories) = sample();
    let html = render(HarnessProps {
        tasks,
        categories,
        loading: false,
        date: day(2024, 5, 1),
        today: day(2024, 5, 1),
        width: 1000.0,
        height: 800.0,
    });

    assert!(html.contains("Prepare the quarterly planning deck"));
    assert_eq!(html.matches("class=\"tooltip\"").count(), 1);
    assert!(html.contains("opacity: 0; transition: opacity 200ms"));
}

#[tokio::test]
async fn test_edges_render_before_nodes() {
    let (tasks, categories) = sample();
    let html = render(HarnessProps {
        tasks,
        categories,
        loading: false,
        date: day(2024, 5, 1),
        today: day(2024, 5, 1),
        width: 1000.0,
        height: 800.0,
    });

    let edges = html.find("class=\"edges\"").unwrap();
    let nodes = html.find("class=\"nodes\"").unwrap();
    let overlays = html.find("class=\"overlays\"").unwrap();
    assert!(edges < nodes && nodes < overlays);
}

#[tokio::test]
async fn test_empty_day_shows_placeholder() {
    let (tasks, categories) = sample();
    let html = render(HarnessProps {
        tasks,
        categories,
        loading: false,
        date: day(2024, 6, 9),
        today: day(2024, 5, 1),
        width: 1000.0,
        height: 800.0,
    });

    assert!(html.contains("Jun 9"));
    assert!(html.contains(PLACEHOLDER_TEXT));
    assert!(!html.contains("class=\"category\""));
}

#[tokio::test]
async fn test_loading_shows_center_only() {
    let (tasks, categories) = sample();
    let html = render(HarnessProps {
        tasks,
        categories,
        loading: true,
        date: day(2024, 5, 1),
        today: day(2024, 5, 1),
        width: 1000.0,
        height: 800.0,
    });

    assert!(html.contains("TODAY"));
    assert!(!html.contains(PLACEHOLDER_TEXT));
    assert!(!html.contains("class=\"category\""));
    assert!(!html.contains("Morning run"));
}

#[tokio::test]
async fn test_zero_size_renders_no_svg() {
    let (tasks, categories) = sample();
    let html = render(HarnessProps {
        tasks,
        categories,
        loading: false,
        date: day(2024, 5, 1),
        today: day(2024, 5, 1),
        width: 0.0,
        height: 800.0,
    });

    assert!(html.contains("mind-map-pending"));
    assert!(!html.contains("<svg"));
}

fn center_circle(html: &str) -> &str {
    let start = html.find("class=\"center\"").unwrap();
    let end = start + html[start..].find("</circle>").unwrap();
    &html[start..end]
}

#[tokio::test]
async fn test_scene_follows_viewport_size() {
    let (tasks, categories) = sample();
    let props = |width: f64, height: f64| HarnessProps {
        tasks: tasks.clone(),
        categories: categories.clone(),
        loading: false,
        date: day(2024, 5, 1),
        today: day(2024, 5, 1),
        width,
        height,
    };

    let wide = render(props(1000.0, 800.0));
    assert!(wide.contains("width=\"1000\" height=\"800\""));
    assert!(center_circle(&wide).contains("cx=\"500\""));

    let narrow = render(props(600.0, 500.0));
    assert!(narrow.contains("width=\"600\" height=\"500\""));
    assert!(center_circle(&narrow).contains("cx=\"300\""));
    assert!(narrow.contains("Morning run"));
}

#[test]
fn test_saved_pan_is_dropped_when_viewport_changes() {
    let config = LayoutConfig::default();
    let before = Viewport::new(1000.0, 800.0);
    let after = Viewport::new(600.0, 500.0);

    let mut panned = ViewTransform::initial(before, &config);
    panned.pan(40.0, -25.0);
    let saved = Some((before, panned));

    assert_eq!(
        active_transform(saved, before, ViewTransform::initial(before, &config)),
        panned
    );
    let resized = ViewTransform::initial(after, &config);
    assert_eq!(active_transform(saved, after, resized), resized);
    assert_eq!(active_transform(None, after, resized), resized);
}

#[test]
fn test_successive_pans_accumulate() {
    let config = LayoutConfig::default();
    let viewport = Viewport::new(1000.0, 800.0);
    let initial = ViewTransform::initial(viewport, &config);

    let mut saved = None;
    for _ in 0..3 {
        let mut next = active_transform(saved, viewport, initial);
        next.pan(10.0, 5.0);
        saved = Some((viewport, next));
    }

    let current = active_transform(saved, viewport, initial);
    assert!((current.translate_x - initial.translate_x - 30.0).abs() < 1e-9);
    assert!((current.translate_y - initial.translate_y - 15.0).abs() < 1e-9);
}

#[test]
fn test_wheel_zoom_anchors_at_pointer_or_center() {
    let viewport = Viewport::new(1000.0, 800.0);
    assert_eq!(wheel_anchor(Some(Point::new(120.0, 40.0)), viewport), Point::new(120.0, 40.0));
    assert_eq!(wheel_anchor(None, viewport), Point::new(500.0, 400.0));
}
