//! Equilateral triangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, point_in_polygon, points_bounds};
use kurbo::{BezPath, Point, Rect, Vec2};
use uuid::Uuid;

/// An upward-pointing equilateral triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub(crate) id: ShapeId,
    /// Centroid of the triangle.
    pub center: Point,
    /// Distance from the centroid to each vertex.
    pub size: f64,
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Triangle {
    pub fn new(center: Point, size: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            size,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Apex first, then bottom-right and bottom-left.
    pub fn vertices(&self) -> [Point; 3] {
        [-90.0f64, 30.0, 150.0]
            .map(|deg| self.center + Vec2::from_angle(deg.to_radians()) * self.size)
    }
}

impl ShapeTrait for Triangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        points_bounds(self.vertices(), self.center)
    }

    fn contains_local(&self, point: Point) -> bool {
        point_in_polygon(point, &self.vertices())
    }

    fn local_path(&self) -> BezPath {
        let [a, b, c] = self.vertices();
        let mut path = BezPath::new();
        path.move_to(a);
        path.line_to(b);
        path.line_to(c);
        path.close_path();
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_bounds() {
        let tri = Triangle::new(Point::ZERO, 10.0);
        let b = tri.bounds();
        assert!((b.y0 + 10.0).abs() < 1e-9);
        assert!((b.y1 - 5.0).abs() < 1e-9);
        assert!((b.width() - 10.0 * 3f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_triangle_hit() {
        let tri = Triangle::new(Point::ZERO, 10.0);
        assert!(tri.contains_local(Point::ZERO));
        // Bounding box corner is outside the triangle.
        assert!(!tri.contains_local(Point::new(-8.0, -9.0)));
    }
}
