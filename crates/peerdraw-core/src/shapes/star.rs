//! Star shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Vec2};
use std::f64::consts::PI;
use uuid::Uuid;

/// Fewest points a star can have.
pub const MIN_STAR_POINTS: u32 = 3;
/// Most points a star can have.
pub const MAX_STAR_POINTS: u32 = 100;

/// A star with alternating outer and inner vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub(crate) id: ShapeId,
    pub center: Point,
    pub outer_radius: f64,
    pub inner_radius: f64,
    /// Number of outer points, within [`MIN_STAR_POINTS`]..=[`MAX_STAR_POINTS`].
    pub points: u32,
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Star {
    pub fn new(center: Point, outer_radius: f64, inner_radius: f64, points: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            outer_radius,
            inner_radius,
            points: points.clamp(MIN_STAR_POINTS, MAX_STAR_POINTS),
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Star with the conventional inner radius of half the outer one.
    pub fn with_outer_radius(center: Point, outer_radius: f64, points: u32) -> Self {
        Self::new(center, outer_radius, outer_radius * 0.5, points)
    }

    /// Vertices starting at the top point and going clockwise.
    pub fn vertices(&self) -> Vec<Point> {
        let count = self.points.clamp(MIN_STAR_POINTS, MAX_STAR_POINTS) as usize * 2;
        (0..count)
            .map(|i| {
                let angle = -PI / 2.0 + i as f64 * PI / (count as f64 / 2.0);
                let radius = if i % 2 == 0 { self.outer_radius } else { self.inner_radius };
                self.center + Vec2::from_angle(angle) * radius
            })
            .collect()
    }

    /// Grow or shrink both radii by `amount`, keeping their ratio.
    pub fn grow(&mut self, base_outer: f64, base_inner: f64, amount: f64) {
        let outer = (base_outer + amount).max(1.0);
        let ratio = if base_outer > 0.0 { base_inner / base_outer } else { 0.5 };
        self.outer_radius = outer;
        self.inner_radius = outer * ratio;
    }
}

impl ShapeTrait for Star {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let d = self.outer_radius * 2.0;
        Rect::from_center_size(self.center, (d, d))
    }

    // Hit area is the circumscribed circle rather than the star outline.
    fn contains_local(&self, point: Point) -> bool {
        (point - self.center).hypot() <= self.outer_radius
    }

    fn local_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for (i, v) in self.vertices().into_iter().enumerate() {
            if i == 0 {
                path.move_to(v);
            } else {
                path.line_to(v);
            }
        }
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
    fn test_vertices() {
        let star = Star::new(Point::ZERO, 10.0, 5.0, 5);
        let v = star.vertices();
        assert_eq!(v.len(), 10);
        assert!(v[0].x.abs() < 1e-9);
        assert!((v[0].y + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_points() {
        let star = Star::new(Point::ZERO, 10.0, 5.0, 1);
        assert_eq!(star.points, MIN_STAR_POINTS);
        let star = Star::new(Point::ZERO, 10.0, 5.0, u32::MAX);
        assert_eq!(star.points, MAX_STAR_POINTS);
    }

    #[test]
    fn test_vertices_bounded_for_out_of_range_points() {
        let mut star = Star::new(Point::ZERO, 10.0, 5.0, 5);
        star.points = u32::MAX;
        assert_eq!(star.vertices().len(), MAX_STAR_POINTS as usize * 2);
    }

    #[test]
    fn test_hit_uses_outer_radius() {
        let star = Star::new(Point::ZERO, 10.0, 2.0, 5);
        // Between two arms, outside the outline but inside the outer circle.
        let gap = Point::new(0.0, 9.0);
        assert!(star.contains_local(gap));
        assert!(!star.contains_local(Point::new(0.0, 10.5)));
    }

    #[test]
    fn test_grow_keeps_ratio() {
        let mut star = Star::new(Point::ZERO, 10.0, 4.0, 5);
        star.grow(10.0, 4.0, 10.0);
        assert!((star.outer_radius - 20.0).abs() < 1e-9);
        assert!((star.inner_radius - 8.0).abs() < 1e-9);
        star.grow(10.0, 4.0, -50.0);
        assert!((star.outer_radius - 1.0).abs() < 1e-9);
    }
}
