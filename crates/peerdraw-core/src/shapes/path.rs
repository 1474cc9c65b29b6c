//! Freehand path shape.

use super::{
    LINE_HIT_TOLERANCE, ShapeId, ShapeStyle, ShapeTrait, point_to_polyline_dist, points_bounds,
};
use kurbo::{BezPath, Point, Rect, Vec2};
use uuid::Uuid;

/// An open polyline recorded from pointer movement. Points are relative to
/// `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub(crate) id: ShapeId,
    pub origin: Point,
    pub points: Vec<Vec2>,
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Path {
    /// Start a path at `origin` with a single point.
    pub fn new(origin: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            points: vec![Vec2::ZERO],
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Append an absolute point.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point - self.origin);
    }

    pub fn absolute_points(&self) -> Vec<Point> {
        self.points.iter().map(|v| self.origin + *v).collect()
    }

    /// Replace the points with absolute positions, keeping the origin.
    pub fn set_absolute_points(&mut self, points: &[Point]) {
        self.points = points.iter().map(|p| *p - self.origin).collect();
    }
}

impl ShapeTrait for Path {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        points_bounds(self.absolute_points(), self.origin)
    }

    fn contains_local(&self, point: Point) -> bool {
        let tolerance = LINE_HIT_TOLERANCE + self.style.stroke_width / 2.0;
        point_to_polyline_dist(point, &self.absolute_points()) <= tolerance
    }

    fn local_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for (i, p) in self.absolute_points().into_iter().enumerate() {
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.origin += delta;
    }
}
