//! Arrow shape.

use super::{LINE_HIT_TOLERANCE, ShapeId, ShapeStyle, ShapeTrait, point_to_segment_dist};
use kurbo::{BezPath, Point, Rect, Vec2};
use uuid::Uuid;

/// Default arrowhead length.
pub const DEFAULT_HEAD_SIZE: f64 = 15.0;

/// A line with an arrowhead at its end.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub(crate) id: ShapeId,
    /// Start point (tail).
    pub start: Point,
    /// End point (head).
    pub end: Point,
    /// Size of the arrowhead.
    pub head_size: f64,
    /// Rotation in degrees around the bounds center.
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Arrow {
    /// Create a new arrow.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            head_size: DEFAULT_HEAD_SIZE,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Get the direction vector (normalized).
    pub fn direction(&self) -> Vec2 {
        let d = self.end - self.start;
        let len = d.hypot();
        if len > 0.0 { d / len } else { Vec2::new(1.0, 0.0) }
    }

    /// The two barb tips of the arrowhead.
    pub fn head_points(&self) -> (Point, Point) {
        let dir = self.direction();
        let perp = Vec2::new(-dir.y, dir.x);
        let back = self.end - dir * self.head_size;
        let half = self.head_size * 0.5;
        (back + perp * half, back - perp * half)
    }
}

impl ShapeTrait for Arrow {
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
        let (left, right) = self.head_points();
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path.move_to(left);
        path.line_to(self.end);
        path.line_to(right);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_direction() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let dir = arrow.direction();
        assert!((dir.x - 1.0).abs() < f64::EPSILON);
        assert!(dir.y.abs() < f64::EPSILON);
    }

    #[test]
    fn test_head_points() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let (left, right) = arrow.head_points();
        assert!((left.x - 85.0).abs() < 1e-9);
        assert!((right.x - 85.0).abs() < 1e-9);
        assert!(((left.y - right.y).abs() - DEFAULT_HEAD_SIZE).abs() < 1e-9);
    }

    #[test]
    fn test_arrow_hit_test() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(arrow.contains_local(Point::new(50.0, 0.0)));
        assert!(arrow.contains_local(Point::new(50.0, 4.0)));
        assert!(!arrow.contains_local(Point::new(50.0, 20.0)));
    }

    #[test]
    fn test_zero_length_direction() {
        let arrow = Arrow::new(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        assert_eq!(arrow.direction(), Vec2::new(1.0, 0.0));
    }
}
