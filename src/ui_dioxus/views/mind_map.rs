use chrono::NaiveDate;
use dioxus::prelude::*;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::config::MindFlowConfig;
use crate::domain::category::Category;
use crate::domain::task::Task;
use crate::layout::scene::{BACKGROUND_COLOR, CENTER_COLOR, MUTED_TEXT_COLOR, TASK_FILL, TEXT_COLOR};
use crate::layout::{HitIndex, Point, RadialLayoutRenderer, RenderInput, RenderPhase, ViewTransform, Viewport};
use crate::services::TaskAggregator;

const ZOOM_STEP: f64 = 1.1;
/// Pointer travel (px) after which a press counts as a drag, not a click.
const CLICK_SLOP: f64 = 4.0;
/// How often the host element is re-measured to catch resizes and scrolls.
const REMEASURE_INTERVAL: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    last: Point,
    travelled: f64,
}

/// Pan/zoom saved for `saved.0`, or the scene's initial transform when the
/// viewport has changed since.
pub(crate) fn active_transform(
    saved: Option<(Viewport, ViewTransform)>,
    viewport: Viewport,
    initial: ViewTransform,
) -> ViewTransform {
    match saved {
        Some((vp, transform)) if vp == viewport => transform,
        _ => initial,
    }
}

/// Wheel zoom is anchored at the last pointer position over the map.
pub(crate) fn wheel_anchor(pointer: Option<Point>, viewport: Viewport) -> Point {
    pointer.unwrap_or_else(|| viewport.center())
}

/// Radial mind map of the tasks due on `selected_date`.
///
/// Without fixed `width`/`height` the map measures its host element, draws
/// nothing until it has a size, and keeps re-measuring while mounted.
#[component]
pub fn MindMap(
    tasks: Vec<Task>,
    categories: Vec<Category>,
    loading: bool,
    selected_date: NaiveDate,
    today: NaiveDate,
    on_task_selected: EventHandler<Uuid>,
    width: Option<f64>,
    height: Option<f64>,
) -> Element {
    let layout = try_use_context::<MindFlowConfig>()
        .map(|c| c.layout)
        .unwrap_or_default();

    let mut element = use_signal(|| None::<Rc<MountedData>>);
    let mut measured = use_signal(|| None::<Viewport>);
    let mut origin = use_signal(Point::default);
    let mut view = use_signal(|| None::<(Viewport, ViewTransform)>);
    let mut drag = use_signal(|| None::<DragState>);
    let mut suppress_click = use_signal(|| false);
    let mut hovered = use_signal(|| None::<Uuid>);
    let mut pointer = use_signal(|| None::<Point>);

    // Signals are only written when the measurement actually moved.
    let remeasure = move || {
        spawn(async move {
            let Some(handle) = element.peek().clone() else {
                return;
            };
            let Ok(rect) = handle.get_client_rect().await else {
                return;
            };
            let next_origin = Point::new(rect.origin.x, rect.origin.y);
            if *origin.peek() != next_origin {
                origin.set(next_origin);
            }
            let next = Viewport::new(rect.size.width, rect.size.height);
            if *measured.peek() != Some(next) {
                debug!(width = next.width, height = next.height, "Mind map resized");
                measured.set(Some(next));
            }
        });
    };

    use_hook(move || {
        spawn(async move {
            loop {
                tokio::time::sleep(REMEASURE_INTERVAL).await;
                remeasure();
            }
        })
    });

    let viewport = match (width, height) {
        (Some(w), Some(h)) => Some(Viewport::new(w, h)),
        _ => measured(),
    };

    let phase = if loading {
        RenderPhase::Loading(selected_date)
    } else {
        RenderPhase::Ready(TaskAggregator::new().build_day_view(&tasks, &categories, selected_date))
    };
    let renderer = RadialLayoutRenderer::new(layout);
    let scene = viewport.and_then(|viewport| renderer.render(&RenderInput { phase, viewport, today }));

    let on_mounted = move |evt: MountedEvent| {
        element.set(Some(evt.data()));
        remeasure();
    };

    let Some(scene) = scene else {
        return rsx! {
            div {
                class: "mind-map mind-map-pending",
                style: "width: 100%; height: 100%;",
                onmounted: on_mounted,
            }
        };
    };

    // Pan/zoom survives re-renders but resets when the viewport changes.
    let current_viewport = scene.viewport;
    let initial = scene.initial_transform;
    let transform = active_transform(view(), current_viewport, initial);
    let current_transform = move || active_transform(*view.peek(), current_viewport, initial);

    let hits = Rc::new(HitIndex::new(&scene));
    let transition_ms = scene.tooltip_transition_ms;
    let transform_attr = transform.to_svg();

    let screen_point = move |evt: &MouseEvent| {
        let client = evt.client_coordinates();
        let origin = *origin.peek();
        Point::new(client.x - origin.x, client.y - origin.y)
    };

    let click_hits = hits.clone();
    let hover_hits = hits.clone();

    rsx! {
        div {
            class: "mind-map",
            style: "width: 100%; height: 100%; overflow: hidden; user-select: none;",
            onmounted: on_mounted,

            svg {
                xmlns: "http://www.w3.org/2000/svg",
                width: "{scene.viewport.width}",
                height: "{scene.viewport.height}",
                style: if drag().is_some() { "cursor: grabbing;" } else { "cursor: grab;" },

                onmouseenter: move |_| remeasure(),
                onmousedown: move |evt: MouseEvent| {
                    remeasure();
                    drag.set(Some(DragState { last: screen_point(&evt), travelled: 0.0 }));
                },
                onmousemove: move |evt: MouseEvent| {
                    let point = screen_point(&evt);
                    pointer.set(Some(point));
                    let state = *drag.peek();
                    if let Some(state) = state {
                        let (dx, dy) = (point.x - state.last.x, point.y - state.last.y);
                        let mut next = current_transform();
                        next.pan(dx, dy);
                        view.set(Some((current_viewport, next)));
                        drag.set(Some(DragState {
                            last: point,
                            travelled: state.travelled + dx.hypot(dy),
                        }));
                    } else {
                        let target = hover_hits.tooltip_target(current_transform().to_world(point));
                        if *hovered.peek() != target {
                            hovered.set(target);
                        }
                    }
                },
                onmouseup: move |_| {
                    let state = *drag.peek();
                    if let Some(state) = state {
                        suppress_click.set(state.travelled > CLICK_SLOP);
                    }
                    drag.set(None);
                },
                onmouseleave: move |_| {
                    drag.set(None);
                    hovered.set(None);
                    pointer.set(None);
                },
                onwheel: move |evt: WheelEvent| {
                    let delta = evt.delta().strip_units();
                    let factor = if delta.y < 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
                    let anchor = wheel_anchor(*pointer.peek(), current_viewport);
                    let mut next = current_transform();
                    next.zoom_at(factor, anchor);
                    view.set(Some((current_viewport, next)));
                },
                onclick: move |evt: MouseEvent| {
                    if *suppress_click.peek() {
                        suppress_click.set(false);
                        return;
                    }
                    let world = current_transform().to_world(screen_point(&evt));
                    if let Some(id) = click_hits.task_at(world) {
                        on_task_selected.call(id);
                    }
                },

                // Background
                rect {
                    class: "background",
                    x: "0",
                    y: "0",
                    width: "{scene.viewport.width}",
                    height: "{scene.viewport.height}",
                    fill: BACKGROUND_COLOR,
                }

                // Edges sit beneath every node
                g {
                    class: "edges",
                    transform: "{transform_attr}",
                    for (i, edge) in scene.edges.iter().enumerate() {
                        line {
                            key: "{i}",
                            x1: "{edge.from.x}",
                            y1: "{edge.from.y}",
                            x2: "{edge.to.x}",
                            y2: "{edge.to.y}",
                            stroke: "{edge.color}",
                            "stroke-width": "2",
                            "stroke-opacity": "0.6",
                        }
                    }
                }

                g {
                    class: "nodes",
                    transform: "{transform_attr}",

                    g {
                        class: "center",
                        circle {
                            cx: "{scene.center.position.x}",
                            cy: "{scene.center.position.y}",
                            r: "{scene.center.radius}",
                            fill: CENTER_COLOR,
                        }
                        text {
                            x: "{scene.center.position.x}",
                            y: "{scene.center.position.y}",
                            "text-anchor": "middle",
                            "dominant-baseline": "middle",
                            "font-size": "{scene.center.font_size}",
                            "font-weight": "bold",
                            fill: TEXT_COLOR,
                            "{scene.center.label}"
                        }
                    }

                    for category in scene.categories.iter() {
                        g {
                            key: "{category.id}",
                            class: "category",
                            rect {
                                x: "{category.pill.x}",
                                y: "{category.pill.y}",
                                width: "{category.pill.width}",
                                height: "{category.pill.height}",
                                rx: "{category.pill.height / 2.0}",
                                fill: "{category.color}",
                            }
                            text {
                                x: "{category.position.x}",
                                y: "{category.position.y}",
                                "text-anchor": "middle",
                                "dominant-baseline": "middle",
                                "font-size": "{category.font_size}",
                                "font-weight": "600",
                                fill: TEXT_COLOR,
                                "{category.name}"
                            }
                        }
                    }

                    for task in scene.tasks.iter() {
                        g {
                            key: "{task.id}",
                            class: if task.completed { "task task-completed" } else { "task" },
                            "data-task-id": "{task.id}",
                            style: "cursor: pointer;",
                            rect {
                                x: "{task.pill.x}",
                                y: "{task.pill.y}",
                                width: "{task.pill.width}",
                                height: "{task.pill.height}",
                                rx: "{task.pill.height / 2.0}",
                                fill: TASK_FILL,
                                stroke: "{task.color}",
                                "stroke-width": "2",
                            }
                            text {
                                x: "{task.position.x}",
                                y: "{task.position.y}",
                                "text-anchor": "middle",
                                "dominant-baseline": "middle",
                                "font-size": "{task.font_size}",
                                "text-decoration": if task.strikethrough() { "line-through" } else { "none" },
                                fill: if task.completed { MUTED_TEXT_COLOR } else { TEXT_COLOR },
                                "{task.label.display}"
                            }
                            if let Some(badge) = task.badge {
                                g {
                                    class: badge.kind.css_class(),
                                    circle {
                                        cx: "{badge.position.x}",
                                        cy: "{badge.position.y}",
                                        r: "{badge.radius}",
                                        fill: badge.kind.color(),
                                    }
                                    text {
                                        x: "{badge.position.x}",
                                        y: "{badge.position.y}",
                                        "text-anchor": "middle",
                                        "dominant-baseline": "middle",
                                        "font-size": "10",
                                        "font-weight": "bold",
                                        fill: TEXT_COLOR,
                                        "{badge.kind.symbol()}"
                                    }
                                }
                            }
                            if let Some(caption) = &task.rollover_caption {
                                text {
                                    class: "rollover",
                                    x: "{caption.position.x}",
                                    y: "{caption.position.y}",
                                    "text-anchor": "middle",
                                    "font-size": "10",
                                    fill: MUTED_TEXT_COLOR,
                                    "{caption.text}"
                                }
                            }
                        }
                    }
                }

                g {
                    class: "overlays",
                    transform: "{transform_attr}",
                    "pointer-events": "none",

                    if let Some(placeholder) = &scene.placeholder {
                        text {
                            class: "placeholder",
                            x: "{placeholder.position.x}",
                            y: "{placeholder.position.y}",
                            "text-anchor": "middle",
                            "font-size": "14",
                            fill: MUTED_TEXT_COLOR,
                            "{placeholder.text}"
                        }
                    }

                    for tooltip in scene.tooltips.iter() {
                        g {
                            key: "{tooltip.task_id}",
                            class: "tooltip",
                            style: format!(
                                "opacity: {}; transition: opacity {}ms ease-in-out;",
                                if hovered() == Some(tooltip.task_id) { 1 } else { 0 },
                                transition_ms
                            ),
                            rect {
                                x: "{tooltip.rect.x}",
                                y: "{tooltip.rect.y}",
                                width: "{tooltip.rect.width}",
                                height: "{tooltip.rect.height}",
                                rx: "6",
                                fill: "#334155",
                            }
                            text {
                                x: "{tooltip.rect.center().x}",
                                y: "{tooltip.rect.center().y}",
                                "text-anchor": "middle",
                                "dominant-baseline": "middle",
                                "font-size": "{tooltip.font_size}",
                                fill: TEXT_COLOR,
                                "{tooltip.text}"
                            }
                        }
                    }
                }
            }
        }
    }
}
