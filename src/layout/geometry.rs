use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point `radius` away from `origin` along `angle` (radians, screen
    /// coordinates with y pointing down).
    pub fn polar(origin: Point, radius: f64, angle: f64) -> Self {
        Self {
            x: origin.x + radius * angle.cos(),
            y: origin.y + radius * angle.sin(),
        }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Angle of `self` as seen from `origin`.
    pub fn angle_from(self, origin: Point) -> f64 {
        (self.y - origin.y).atan2(self.x - origin.x)
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn centered_at(center: Point, width: f64, height: f64) -> Self {
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left() && point.x <= self.right() && point.y >= self.top() && point.y <= self.bottom()
    }
}

/// Angle of category `index` out of `count`, spaced evenly with the first
/// one pointing straight up.
pub fn category_angle(index: usize, count: usize) -> f64 {
    if count == 0 {
        return -FRAC_PI_2;
    }
    index as f64 * (TAU / count as f64) - FRAC_PI_2
}

/// Angle of task `index` out of `count`, fanned symmetrically around its
/// category's angle in steps of `spread`.
pub fn task_angle(category_angle: f64, index: usize, count: usize, spread: f64) -> f64 {
    let middle = (count.max(1) as f64 - 1.0) / 2.0;
    category_angle + (index as f64 - middle) * spread
}
