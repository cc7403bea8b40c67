use chrono::NaiveDate;
use tracing::debug;

use super::geometry::{Point, Rect, category_angle, task_angle};
use super::scene::{
    Badge, BadgeKind, Caption, CategoryNode, CenterNode, Edge, EdgeKind, PLACEHOLDER_TEXT, Placeholder, Scene,
    TaskNode, Tooltip,
};
use super::text::{ApproximateTextMeasurer, TextMeasurer, pill_width, truncate_label};
use super::transform::{ViewTransform, Viewport};
use crate::config::LayoutConfig;
use crate::domain::day_view::DayView;

const BADGE_RADIUS: f64 = 9.0;
const BADGE_GAP: f64 = 6.0;
const CAPTION_GAP: f64 = 12.0;
const TOOLTIP_GAP: f64 = 8.0;
const PLACEHOLDER_GAP: f64 = 40.0;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderPhase {
    /// Data has not arrived yet; only the day is known.
    Loading(NaiveDate),
    Ready(DayView),
}

impl RenderPhase {
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Loading(date) => *date,
            Self::Ready(view) => view.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderInput {
    pub phase: RenderPhase,
    pub viewport: Viewport,
    pub today: NaiveDate,
}

impl RenderInput {
    pub fn loading(date: NaiveDate, viewport: Viewport, today: NaiveDate) -> Self {
        Self {
            phase: RenderPhase::Loading(date),
            viewport,
            today,
        }
    }

    pub fn ready(view: DayView, viewport: Viewport, today: NaiveDate) -> Self {
        Self {
            phase: RenderPhase::Ready(view),
            viewport,
            today,
        }
    }
}

/// `TODAY` for the current day, otherwise a short month/day label.
pub fn center_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "TODAY".to_string()
    } else {
        date.format("%b %-d").to_string()
    }
}

/// Lays a day view out as a radial mind map.
///
/// Every call recomputes the whole scene from its input; nothing is cached
/// between renders.
#[derive(Debug, Clone)]
pub struct RadialLayoutRenderer<M = ApproximateTextMeasurer> {
    config: LayoutConfig,
    measurer: M,
}

impl RadialLayoutRenderer<ApproximateTextMeasurer> {
    pub fn new(config: LayoutConfig) -> Self {
        Self::with_measurer(config, ApproximateTextMeasurer)
    }
}

impl Default for RadialLayoutRenderer<ApproximateTextMeasurer> {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl<M: TextMeasurer> RadialLayoutRenderer<M> {
    pub fn with_measurer(config: LayoutConfig, measurer: M) -> Self {
        Self { config, measurer }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Returns `None` while the viewport has no usable size.
    pub fn render(&self, input: &RenderInput) -> Option<Scene> {
        if !input.viewport.is_renderable() {
            debug!(
                width = input.viewport.width,
                height = input.viewport.height,
                "Viewport not ready, skipping render"
            );
            return None;
        }

        let cfg = &self.config;
        let center = input.viewport.center().offset(0.0, cfg.header_offset);

        let mut scene = Scene {
            viewport: input.viewport,
            initial_transform: ViewTransform::initial(input.viewport, cfg),
            center: CenterNode {
                position: center,
                radius: cfg.center_radius,
                label: center_label(input.phase.date(), input.today),
                font_size: cfg.center_font_size,
            },
            edges: Vec::new(),
            categories: Vec::new(),
            tasks: Vec::new(),
            tooltips: Vec::new(),
            placeholder: None,
            tooltip_transition_ms: cfg.tooltip_transition_ms,
        };

        let view = match &input.phase {
            RenderPhase::Loading(_) => {
                debug!("Rendering loading state");
                return Some(scene);
            }
            RenderPhase::Ready(view) => view,
        };

        if view.is_empty() {
            scene.placeholder = Some(Placeholder {
                text: PLACEHOLDER_TEXT.to_string(),
                position: center.offset(0.0, cfg.center_radius + PLACEHOLDER_GAP),
            });
            debug!(date = %view.date, "Rendering empty day");
            return Some(scene);
        }

        let count = view.categories.len();
        for (i, branch) in view.categories.iter().enumerate() {
            let angle = category_angle(i, count);
            let position = Point::polar(center, cfg.category_distance, angle);
            let width = pill_width(
                &self.measurer,
                &branch.category.name,
                cfg.category_font_size,
                cfg.pill_padding,
                cfg.category_min_width,
            );

            scene.edges.push(Edge {
                kind: EdgeKind::CenterToCategory,
                from: center,
                to: position,
                color: branch.category.color.clone(),
            });
            scene.categories.push(CategoryNode {
                id: branch.category.id,
                name: branch.category.name.clone(),
                color: branch.category.color.clone(),
                angle,
                position,
                pill: Rect::centered_at(position, width, cfg.category_pill_height),
                font_size: cfg.category_font_size,
            });

            let m = branch.tasks.len();
            for (j, task) in branch.tasks.iter().enumerate() {
                let fan_angle = task_angle(angle, j, m, cfg.task_spread);
                let task_position = Point::polar(position, cfg.task_distance, fan_angle);
                let label = truncate_label(&task.title, cfg.label_max_chars);
                let width = pill_width(
                    &self.measurer,
                    &label.display,
                    cfg.task_font_size,
                    cfg.pill_padding,
                    cfg.task_min_width,
                );
                let pill = Rect::centered_at(task_position, width, cfg.task_pill_height);
                let completed = task.is_completed();

                let badge = BadgeKind::for_task(completed, task.priority).map(|kind| Badge {
                    kind,
                    position: Point::new(pill.right() + BADGE_GAP + BADGE_RADIUS, task_position.y),
                    radius: BADGE_RADIUS,
                });
                let rollover_caption = (task.rollover_count > 0).then(|| Caption {
                    text: format!("↻ {}", task.rollover_count),
                    position: Point::new(task_position.x, pill.bottom() + CAPTION_GAP),
                });

                if label.truncated {
                    let tooltip_width =
                        self.measurer.measure(&label.full, cfg.task_font_size) + cfg.pill_padding;
                    scene.tooltips.push(Tooltip {
                        task_id: task.id,
                        text: label.full.clone(),
                        rect: Rect::centered_at(
                            Point::new(
                                task_position.x,
                                pill.top() - TOOLTIP_GAP - cfg.task_pill_height / 2.0,
                            ),
                            tooltip_width,
                            cfg.task_pill_height,
                        ),
                        font_size: cfg.task_font_size,
                    });
                }

                scene.edges.push(Edge {
                    kind: EdgeKind::CategoryToTask,
                    from: position,
                    to: task_position,
                    color: branch.category.color.clone(),
                });
                scene.tasks.push(TaskNode {
                    id: task.id,
                    category_id: branch.category.id,
                    label,
                    color: branch.category.color.clone(),
                    angle: fan_angle,
                    position: task_position,
                    pill,
                    font_size: cfg.task_font_size,
                    completed,
                    priority: task.priority,
                    badge,
                    rollover_caption,
                });
            }
        }

        debug!(
            date = %view.date,
            categories = scene.categories.len(),
            tasks = scene.tasks.len(),
            truncated = scene.tooltips.len(),
            "Rendered mind map"
        );
        Some(scene)
    }
}
