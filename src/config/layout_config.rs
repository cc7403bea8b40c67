use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Geometry and interaction constants for the radial mind map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Radius of the central day node
    pub center_radius: f64,

    /// Vertical shift of the diagram centre, leaving room for the header
    pub header_offset: f64,

    /// Distance from the centre to each category node
    pub category_distance: f64,

    /// Distance from a category node to each of its tasks
    pub task_distance: f64,

    /// Angular step between sibling tasks (radians)
    pub task_spread: f64,

    pub category_pill_height: f64,
    pub task_pill_height: f64,

    /// Horizontal room added around a measured label
    pub pill_padding: f64,

    pub category_min_width: f64,
    pub task_min_width: f64,

    /// Task labels longer than this many characters are shortened inline
    pub label_max_chars: usize,

    pub category_font_size: f64,
    pub task_font_size: f64,
    pub center_font_size: f64,

    pub min_zoom: f64,
    pub max_zoom: f64,

    /// Scale applied on load so the full diagram fits the viewport
    pub initial_zoom: f64,

    pub tooltip_transition_ms: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center_radius: 50.0,
            header_offset: 30.0,
            category_distance: 180.0,
            task_distance: 150.0,
            task_spread: 0.6,
            category_pill_height: 36.0,
            task_pill_height: 30.0,
            pill_padding: 24.0,
            category_min_width: 100.0,
            task_min_width: 80.0,
            label_max_chars: 20,
            category_font_size: 14.0,
            task_font_size: 12.0,
            center_font_size: 16.0,
            min_zoom: 0.5,
            max_zoom: 2.0,
            initial_zoom: 0.8,
            tooltip_transition_ms: 200,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("center_radius", self.center_radius),
            ("category_distance", self.category_distance),
            ("task_distance", self.task_distance),
            ("category_pill_height", self.category_pill_height),
            ("task_pill_height", self.task_pill_height),
            ("category_min_width", self.category_min_width),
            ("task_min_width", self.task_min_width),
            ("category_font_size", self.category_font_size),
            ("task_font_size", self.task_font_size),
            ("center_font_size", self.center_font_size),
            ("min_zoom", self.min_zoom),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                bail!("layout.{field} must be a positive number, got {value}");
            }
        }

        for (field, value) in [
            ("header_offset", self.header_offset),
            ("task_spread", self.task_spread),
            ("pill_padding", self.pill_padding),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("layout.{field} must be a non-negative number, got {value}");
            }
        }

        if self.label_max_chars == 0 {
            bail!("layout.label_max_chars must be at least 1");
        }

        if !(self.min_zoom <= self.initial_zoom && self.initial_zoom <= self.max_zoom) {
            bail!(
                "layout zoom range is inconsistent: min {} / initial {} / max {}",
                self.min_zoom,
                self.initial_zoom,
                self.max_zoom
            );
        }

        Ok(())
    }
}
