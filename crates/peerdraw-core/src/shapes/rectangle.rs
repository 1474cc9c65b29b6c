//! Rectangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, RoundedRect, Shape as KurboShape, Vec2};
use uuid::Uuid;

/// A rectangle shape with optional rounded corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Center of the rectangle.
    pub center: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Corner radius (0 = sharp corners).
    pub corner_radius: f64,
    /// Rotation in degrees (around center).
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle centered at `center`.
    pub fn new(center: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            width,
            height,
            corner_radius: 0.0,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let rect = Rect::from_points(p1, p2);
        Self::new(rect.center(), rect.width(), rect.height())
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::from_center_size(self.center, (self.width, self.height))
    }

    /// Replace the geometry with `rect`, keeping identity and style.
    pub fn set_rect(&mut self, rect: Rect) {
        self.center = rect.center();
        self.width = rect.width();
        self.height = rect.height();
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn contains_local(&self, point: Point) -> bool {
        let rect = self.as_rect();
        point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
    }

    fn local_path(&self) -> BezPath {
        if self.corner_radius > 0.0 {
            RoundedRect::from_rect(self.as_rect(), self.corner_radius).to_path(0.1)
        } else {
            self.as_rect().to_path(0.1)
        }
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
