//! Text shape.
//!
//! Glyph layout belongs to the renderer. The box used here is an estimate
//! from character count and font size, which is what hit-testing, selection
//! and resize work against.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use uuid::Uuid;

/// Default font size in points.
pub const DEFAULT_FONT_SIZE: f64 = 20.0;
/// Default font family name.
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";
/// Smallest font size a resize can produce.
pub const MIN_FONT_SIZE: f64 = 4.0;

const CHAR_WIDTH_FACTOR: f64 = 0.6;
const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// A block of text centered on a point.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Center of the text box.
    pub center: Point,
    /// Text content. May contain newlines.
    pub content: String,
    pub font_size: f64,
    pub font_family: String,
    /// Rotation in degrees around the center.
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Text {
    pub fn new(center: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            content,
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Approximate (width, height) of the laid-out text.
    pub fn approx_size(&self) -> (f64, f64) {
        let lines = self.content.split('\n');
        let (count, longest) = lines.fold((0usize, 0usize), |(n, w), line| {
            (n + 1, w.max(line.chars().count()))
        });
        let longest = longest.max(1);
        (
            longest as f64 * self.font_size * CHAR_WIDTH_FACTOR,
            count as f64 * self.font_size * LINE_HEIGHT_FACTOR,
        )
    }

    /// Scale the font by `factor`, never going below [`MIN_FONT_SIZE`].
    pub fn scale_font(&mut self, factor: f64) {
        self.font_size = (self.font_size * factor).max(MIN_FONT_SIZE);
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, self.approx_size())
    }

    fn contains_local(&self, point: Point) -> bool {
        let rect = self.bounds();
        point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
    }

    fn local_path(&self) -> BezPath {
        self.bounds().to_path(0.1)
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
    fn test_approx_size_multiline() {
        let mut text = Text::new(Point::ZERO, "ab\nabcd".to_string());
        text.font_size = 10.0;
        let (w, h) = text.approx_size();
        assert!((w - 24.0).abs() < 1e-9);
        assert!((h - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_has_area() {
        let text = Text::new(Point::ZERO, String::new());
        let (w, h) = text.approx_size();
        assert!(w > 0.0 && h > 0.0);
    }

    #[test]
    fn test_scale_font_floor() {
        let mut text = Text::new(Point::ZERO, "Hi".to_string());
        text.scale_font(2.0);
        assert!((text.font_size - 40.0).abs() < f64::EPSILON);
        text.scale_font(0.001);
        assert!((text.font_size - MIN_FONT_SIZE).abs() < f64::EPSILON);
    }
}
