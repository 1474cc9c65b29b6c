//! Line shape.

use super::{LINE_HIT_TOLERANCE, ShapeId, ShapeStyle, ShapeTrait, point_to_segment_dist};
use kurbo::{BezPath, Point, Rect, Vec2};
use uuid::Uuid;

/// A straight line segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub(crate) id: ShapeId,
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Rotation in degrees around the bounds center.
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Get the length of the line.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    /// Get the midpoint of the line.
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn contains_local(&self, point: Point) -> bool {
        let tolerance = LINE_HIT_TOLERANCE + self.style.stroke_width / 2.0;
        point_to_segment_dist(point, self.start, self.end) <= tolerance
    }

    fn local_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}
