//! Image shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use uuid::Uuid;

/// A placed image. Decoding and painting belong to the renderer; the scene
/// only keeps the source reference (URL or data URL) and the placement box.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub(crate) id: ShapeId,
    pub center: Point,
    pub width: f64,
    pub height: f64,
    /// Image source as given by the host.
    pub src: String,
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Image {
    pub fn new(center: Point, width: f64, height: f64, src: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            width,
            height,
            src,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Fit an image of the given pixel size inside `max_size`, keeping its
    /// aspect ratio. Images smaller than the limit keep their size.
    pub fn fitted(center: Point, pixel_size: (f64, f64), max_size: f64, src: String) -> Self {
        let (w, h) = pixel_size;
        let longest = w.max(h);
        let scale = if longest > max_size && longest > 0.0 { max_size / longest } else { 1.0 };
        Self::new(center, w * scale, h * scale, src)
    }

    pub fn as_rect(&self) -> Rect {
        Rect::from_center_size(self.center, (self.width, self.height))
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.center = rect.center();
        self.width = rect.width();
        self.height = rect.height();
    }
}

impl ShapeTrait for Image {
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
        self.as_rect().to_path(0.1)
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
    fn test_fitted_keeps_aspect() {
        let img = Image::fitted(Point::ZERO, (800.0, 400.0), 400.0, "a.png".into());
        assert!((img.width - 400.0).abs() < f64::EPSILON);
        assert!((img.height - 200.0).abs() < f64::EPSILON);

        let small = Image::fitted(Point::ZERO, (100.0, 50.0), 400.0, "b.png".into());
        assert!((small.width - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_image_hit() {
        let img = Image::new(Point::new(50.0, 50.0), 100.0, 40.0, String::new());
        assert!(img.contains_local(Point::new(0.0, 30.0)));
        assert!(!img.contains_local(Point::new(50.0, 75.0)));
    }
}
