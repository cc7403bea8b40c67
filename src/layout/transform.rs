use serde::{Deserialize, Serialize};

use super::geometry::Point;
use crate::config::LayoutConfig;

/// Size of the drawing surface in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Zero, negative and non-finite sizes mean layout has not happened yet.
    pub fn is_renderable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Pan and zoom applied to the whole diagram: `screen = world * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    min_scale: f64,
    max_scale: f64,
}

impl ViewTransform {
    pub fn identity(config: &LayoutConfig) -> Self {
        Self {
            scale: 1.0_f64.clamp(config.min_zoom, config.max_zoom),
            translate_x: 0.0,
            translate_y: 0.0,
            min_scale: config.min_zoom,
            max_scale: config.max_zoom,
        }
    }

    /// Shrinks the diagram about the viewport centre so the whole radial
    /// layout fits on load.
    pub fn initial(viewport: Viewport, config: &LayoutConfig) -> Self {
        let mut transform = Self::identity(config);
        transform.set_scale_about(config.initial_zoom, viewport.center());
        transform
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    pub fn apply(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.translate_x,
            world.y * self.scale + self.translate_y,
        )
    }

    pub fn to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.translate_x) / self.scale,
            (screen.y - self.translate_y) / self.scale,
        )
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.translate_x += dx;
            self.translate_y += dy;
        }
    }

    /// Multiplies the scale by `factor`, keeping the world point under
    /// `anchor` (screen coordinates) fixed. The result stays within bounds.
    pub fn zoom_at(&mut self, factor: f64, anchor: Point) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.set_scale_about(self.scale * factor, anchor);
    }

    fn set_scale_about(&mut self, scale: f64, anchor: Point) {
        let world = self.to_world(anchor);
        self.scale = scale.clamp(self.min_scale, self.max_scale);
        self.translate_x = anchor.x - world.x * self.scale;
        self.translate_y = anchor.y - world.y * self.scale;
    }

    /// Value for an SVG `transform` attribute.
    pub fn to_svg(&self) -> String {
        format!(
            "translate({:.2} {:.2}) scale({:.4})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}
