//! Circle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use uuid::Uuid;

/// A circle defined by its center and radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub(crate) id: ShapeId,
    /// Center of the circle.
    pub center: Point,
    pub radius: f64,
    /// Rotation in degrees. Invisible for a plain circle but kept for
    /// consistency with group rotation.
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Circle centered on `center` that passes through `edge`.
    pub fn from_center_and_point(center: Point, edge: Point) -> Self {
        Self::new(center, (edge - center).hypot())
    }

    pub fn as_circle(&self) -> kurbo::Circle {
        kurbo::Circle::new(self.center, self.radius)
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, (self.radius * 2.0, self.radius * 2.0))
    }

    fn contains_local(&self, point: Point) -> bool {
        (point - self.center).hypot() <= self.radius
    }

    fn local_path(&self) -> BezPath {
        self.as_circle().to_path(0.1)
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
