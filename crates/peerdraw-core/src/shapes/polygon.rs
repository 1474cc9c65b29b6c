//! Closed polygon shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, point_in_polygon, points_bounds};
use kurbo::{BezPath, Point, Rect, Vec2};
use std::f64::consts::PI;
use uuid::Uuid;

/// Fewest vertices a polygon can have.
pub const MIN_POLYGON_VERTICES: usize = 3;
/// Most sides a regular polygon is built with.
pub const MAX_REGULAR_SIDES: usize = 100;

/// A closed polygon. Vertices are stored relative to `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub(crate) id: ShapeId,
    pub origin: Point,
    /// Vertex offsets from `origin`.
    pub vertices: Vec<Vec2>,
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Polygon {
    pub fn new(origin: Point, vertices: Vec<Vec2>) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            vertices,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Regular polygon with the first vertex pointing up.
    pub fn regular(center: Point, radius: f64, sides: usize) -> Self {
        let sides = sides.clamp(MIN_POLYGON_VERTICES, MAX_REGULAR_SIDES);
        let vertices = (0..sides)
            .map(|i| Vec2::from_angle(-PI / 2.0 + 2.0 * PI * i as f64 / sides as f64) * radius)
            .collect();
        Self::new(center, vertices)
    }

    /// Vertices in the shape's coordinate space.
    pub fn absolute_vertices(&self) -> Vec<Point> {
        self.vertices.iter().map(|v| self.origin + *v).collect()
    }

    /// Replace the vertices with absolute points, keeping the origin.
    pub fn set_absolute_vertices(&mut self, points: &[Point]) {
        self.vertices = points.iter().map(|p| *p - self.origin).collect();
    }
}

impl ShapeTrait for Polygon {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        points_bounds(self.absolute_vertices(), self.origin)
    }

    fn contains_local(&self, point: Point) -> bool {
        point_in_polygon(point, &self.absolute_vertices())
    }

    fn local_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for (i, v) in self.absolute_vertices().into_iter().enumerate() {
            if i == 0 {
                path.move_to(v);
            } else {
                path.line_to(v);
            }
        }
        if !self.vertices.is_empty() {
            path.close_path();
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
