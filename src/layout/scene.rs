use std::fmt::Write;
use uuid::Uuid;

use super::geometry::{Point, Rect};
use super::text::Label;
use super::transform::{ViewTransform, Viewport};
use crate::domain::task::Priority;

pub const BACKGROUND_COLOR: &str = "#0f172a";
pub const CENTER_COLOR: &str = "#6366f1";
pub const TEXT_COLOR: &str = "#f8fafc";
pub const MUTED_TEXT_COLOR: &str = "#94a3b8";
pub const TASK_FILL: &str = "#1e293b";
pub const HIGH_PRIORITY_COLOR: &str = "#ef4444";
pub const MEDIUM_PRIORITY_COLOR: &str = "#f59e0b";
pub const COMPLETED_COLOR: &str = "#22c55e";

pub const PLACEHOLDER_TEXT: &str = "No tasks for this day";

/// Draw order, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    Edges,
    Nodes,
    Overlays,
}

pub const LAYER_ORDER: [Layer; 4] = [Layer::Background, Layer::Edges, Layer::Nodes, Layer::Overlays];

#[derive(Debug, Clone, PartialEq)]
pub struct CenterNode {
    pub position: Point,
    pub radius: f64,
    pub label: String,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryNode {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub angle: f64,
    pub position: Point,
    pub pill: Rect,
    pub font_size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    Completed,
    HighPriority,
    MediumPriority,
}

impl BadgeKind {
    pub fn for_task(completed: bool, priority: Priority) -> Option<Self> {
        if completed {
            return Some(Self::Completed);
        }
        match priority {
            Priority::High => Some(Self::HighPriority),
            Priority::Medium => Some(Self::MediumPriority),
            Priority::Low => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Completed => "✓",
            Self::HighPriority => "!!",
            Self::MediumPriority => "!",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Completed => COMPLETED_COLOR,
            Self::HighPriority => HIGH_PRIORITY_COLOR,
            Self::MediumPriority => MEDIUM_PRIORITY_COLOR,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Completed => "badge badge-done",
            Self::HighPriority => "badge badge-high",
            Self::MediumPriority => "badge badge-medium",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Badge {
    pub kind: BadgeKind,
    pub position: Point,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    pub id: Uuid,
    pub category_id: Uuid,
    pub label: Label,
    pub color: String,
    pub angle: f64,
    pub position: Point,
    pub pill: Rect,
    pub font_size: f64,
    pub completed: bool,
    pub priority: Priority,
    pub badge: Option<Badge>,
    pub rollover_caption: Option<Caption>,
}

impl TaskNode {
    /// Completed tasks are drawn struck through.
    pub fn strikethrough(&self) -> bool {
        self.completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    CenterToCategory,
    CategoryToTask,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub kind: EdgeKind,
    pub from: Point,
    pub to: Point,
    pub color: String,
}

/// Full-text hover box for a task whose inline label was shortened.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub task_id: Uuid,
    pub text: String,
    pub rect: Rect,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub text: String,
    pub position: Point,
}

/// One complete render of the mind map in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub viewport: Viewport,
    pub initial_transform: ViewTransform,
    pub center: CenterNode,
    pub edges: Vec<Edge>,
    pub categories: Vec<CategoryNode>,
    pub tasks: Vec<TaskNode>,
    pub tooltips: Vec<Tooltip>,
    pub placeholder: Option<Placeholder>,
    pub tooltip_transition_ms: u32,
}

impl Scene {
    pub fn task(&self, id: Uuid) -> Option<&TaskNode> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn tooltip_for(&self, task_id: Uuid) -> Option<&Tooltip> {
        self.tooltips.iter().find(|t| t.task_id == task_id)
    }

    /// Whether anything beyond the background and central node was laid out.
    pub fn has_structure(&self) -> bool {
        !self.categories.is_empty()
    }

    /// Standalone SVG document of the scene under its initial transform.
    /// Tooltips become native `<title>` hovers on truncated tasks.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.viewport.width,
            h = self.viewport.height,
        );
        for layer in LAYER_ORDER {
            match layer {
                Layer::Background => self.write_background(&mut svg),
                Layer::Edges => self.write_edges(&mut svg),
                Layer::Nodes => self.write_nodes(&mut svg),
                Layer::Overlays => self.write_overlays(&mut svg),
            }
        }
        svg.push_str("</svg>");
        svg
    }

    fn write_background(&self, svg: &mut String) {
        let _ = write!(
            svg,
            r#"<rect class="background" x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            self.viewport.width, self.viewport.height, BACKGROUND_COLOR
        );
    }

    fn write_edges(&self, svg: &mut String) {
        let _ = write!(svg, r#"<g class="edges" transform="{}">"#, self.initial_transform.to_svg());
        for edge in &self.edges {
            let _ = write!(
                svg,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="2" stroke-opacity="0.6"/>"#,
                edge.from.x,
                edge.from.y,
                edge.to.x,
                edge.to.y,
                escape(&edge.color)
            );
        }
        svg.push_str("</g>");
    }

    fn write_nodes(&self, svg: &mut String) {
        let _ = write!(svg, r#"<g class="nodes" transform="{}">"#, self.initial_transform.to_svg());

        let c = &self.center;
        let _ = write!(
            svg,
            r#"<g class="center"><circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}"/><text x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="middle" font-size="{}" font-weight="bold" fill="{}">{}</text></g>"#,
            c.position.x,
            c.position.y,
            c.radius,
            CENTER_COLOR,
            c.position.x,
            c.position.y,
            c.font_size,
            TEXT_COLOR,
            escape(&c.label)
        );

        for category in &self.categories {
            let _ = write!(
                svg,
                r#"<g class="category">{}<text x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="middle" font-size="{}" font-weight="600" fill="{}">{}</text></g>"#,
                pill(&category.pill, &category.color, "none"),
                category.position.x,
                category.position.y,
                category.font_size,
                TEXT_COLOR,
                escape(&category.name)
            );
        }

        for task in &self.tasks {
            let _ = write!(svg, r#"<g class="task" data-task-id="{}">"#, task.id);
            if task.label.truncated {
                let _ = write!(svg, "<title>{}</title>", escape(&task.label.full));
            }
            svg.push_str(&pill(&task.pill, TASK_FILL, &task.color));
            let _ = write!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="middle" font-size="{}" fill="{}"{}>{}</text>"#,
                task.position.x,
                task.position.y,
                task.font_size,
                if task.completed { MUTED_TEXT_COLOR } else { TEXT_COLOR },
                if task.strikethrough() { r#" text-decoration="line-through""# } else { "" },
                escape(&task.label.display)
            );
            if let Some(badge) = &task.badge {
                let _ = write!(
                    svg,
                    r#"<g class="{}"><circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}"/><text x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="middle" font-size="10" font-weight="bold" fill="{}">{}</text></g>"#,
                    badge.kind.css_class(),
                    badge.position.x,
                    badge.position.y,
                    badge.radius,
                    badge.kind.color(),
                    badge.position.x,
                    badge.position.y,
                    TEXT_COLOR,
                    badge.kind.symbol()
                );
            }
            if let Some(caption) = &task.rollover_caption {
                let _ = write!(
                    svg,
                    r#"<text class="rollover" x="{:.2}" y="{:.2}" text-anchor="middle" font-size="10" fill="{}">{}</text>"#,
                    caption.position.x,
                    caption.position.y,
                    MUTED_TEXT_COLOR,
                    escape(&caption.text)
                );
            }
            svg.push_str("</g>");
        }

        svg.push_str("</g>");
    }

    fn write_overlays(&self, svg: &mut String) {
        if let Some(placeholder) = &self.placeholder {
            let _ = write!(
                svg,
                r#"<g class="overlays" transform="{}"><text class="placeholder" x="{:.2}" y="{:.2}" text-anchor="middle" font-size="14" fill="{}">{}</text></g>"#,
                self.initial_transform.to_svg(),
                placeholder.position.x,
                placeholder.position.y,
                MUTED_TEXT_COLOR,
                escape(&placeholder.text)
            );
        }
    }
}

fn pill(rect: &Rect, fill: &str, stroke: &str) -> String {
    format!(
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="{:.2}" fill="{}" stroke="{}" stroke-width="2"/>"#,
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        rect.height / 2.0,
        escape(fill),
        escape(stroke)
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
