//! Radial mind-map layout: turns a `DayView` and a viewport into a scene of
//! positioned nodes, edges and overlays, plus the pan/zoom and hit-testing
//! state the view needs to make it interactive.

pub mod geometry;
pub mod renderer;
pub mod scene;
pub mod text;
pub mod transform;

pub use geometry::{Point, Rect};
pub use hit_test::HitIndex;
pub use renderer::{RadialLayoutRenderer, RenderInput, RenderPhase, center_label};
pub use scene::{BadgeKind, Layer, Scene};
pub use text::{ApproximateTextMeasurer, TextMeasurer};
pub use transform::{ViewTransform, Viewport};
