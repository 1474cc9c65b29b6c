//! Shape definitions for the drawing surface.

mod arrow;
mod circle;
mod connector;
mod group;
mod image;
mod line;
mod path;
mod polygon;
mod record;
mod rectangle;
mod star;
mod text;
mod triangle;

pub use arrow::Arrow;
pub use circle::Circle;
pub use connector::{Connector, ConnectorRoute};
pub use group::Group;
pub use image::Image;
pub use line::Line;
pub use path::Path;
pub use polygon::{MAX_REGULAR_SIDES, MIN_POLYGON_VERTICES, Polygon};
pub use record::{Geometry, ShapePatch, ShapeRecord};
pub use rectangle::Rectangle;
pub use star::{MAX_STAR_POINTS, MIN_STAR_POINTS, Star};
pub use text::Text;
pub use triangle::Triangle;

use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Extra slack around stroked geometry (lines, paths, connectors) for hit-testing.
pub const LINE_HIT_TOLERANCE: f64 = 5.0;

/// Errors raised when a portable record or patch cannot become a shape.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Shape not found: {0}")]
    NotFound(ShapeId),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for shape conversions.
pub type ShapeResult<T> = Result<T, ShapeError>;

/// Serializable color representation (RGBA8), written as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Hex form; the alpha pair is only written when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(input: &str) -> ShapeResult<Self> {
        let invalid = || ShapeError::InvalidColor(input.to_string());
        let hex = input.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = channel(&c.to_string())?;
                    rgb[i] = v * 17;
                }
                Ok(Self::new(rgb[0], rgb[1], rgb[2], 255))
            }
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = ShapeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties shared by every shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    pub opacity: f64,
    /// Hidden shapes are neither drawn nor hit.
    pub visible: bool,
}

impl ShapeStyle {
    /// Get the stroke color with opacity applied.
    pub fn stroke_with_opacity(&self) -> Color {
        with_opacity(self.stroke_color, self.opacity)
    }

    /// Get the fill color with opacity applied.
    pub fn fill_with_opacity(&self) -> Option<Color> {
        self.fill_color.map(|c| with_opacity(c, self.opacity))
    }

    /// Set the stroke color from a peniko Color.
    pub fn set_stroke(&mut self, color: Color) {
        self.stroke_color = color.into();
    }

    /// Set the fill color from a peniko Color.
    pub fn set_fill(&mut self, color: Option<Color>) {
        self.fill_color = color.map(|c| c.into());
    }
}

fn with_opacity(color: SerializableColor, opacity: f64) -> Color {
    let alpha = (color.a as f64 * opacity.clamp(0.0, 1.0)) as u8;
    Color::from_rgba8(color.r, color.g, color.b, alpha)
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
            opacity: 1.0,
            visible: true,
        }
    }
}

/// Rotate `point` about `center` by `degrees`.
pub fn rotate_point(point: Point, center: Point, degrees: f64) -> Point {
    if degrees == 0.0 {
        return point;
    }
    Affine::rotate_about(degrees.to_radians(), center) * point
}

/// Wrap an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => (point - *only).hypot(),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Even-odd ray cast test against a closed polygon.
pub fn point_in_polygon(point: Point, vertices: &[Point]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (a, b) = (vertices[i], vertices[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Axis-aligned box around a set of points (zero-size at `fallback` when empty).
pub fn points_bounds(points: impl IntoIterator<Item = Point>, fallback: Point) -> Rect {
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return Rect::from_points(fallback, fallback);
    };
    iter.fold(Rect::from_points(first, first), |acc, p| {
        Rect::new(acc.x0.min(p.x), acc.y0.min(p.y), acc.x1.max(p.x), acc.y1.max(p.y))
    })
}

/// Inclusive containment of `inner` within `outer`.
pub fn rect_contains_rect(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

/// Behaviour every shape variant provides.
///
/// Positions are world coordinates (group-local for children of a group).
/// Rotation is applied by [`Shape`], so implementations work in the
/// shape's unrotated frame.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Axis-aligned bounds, ignoring rotation.
    fn bounds(&self) -> Rect;

    /// Containment for a point already mapped into the unrotated frame.
    fn contains_local(&self, point: Point) -> bool;

    /// Outline before rotation.
    fn local_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Move by a world-space offset.
    fn translate(&mut self, delta: Vec2);
}

macro_rules! each_variant {
    ($value:expr, $s:ident => $body:expr) => {
        match $value {
            Shape::Rectangle($s) => $body,
            Shape::Circle($s) => $body,
            Shape::Line($s) => $body,
            Shape::Arrow($s) => $body,
            Shape::Text($s) => $body,
            Shape::Star($s) => $body,
            Shape::Triangle($s) => $body,
            Shape::Polygon($s) => $body,
            Shape::Connector($s) => $body,
            Shape::Group($s) => $body,
            Shape::Image($s) => $body,
            Shape::Path($s) => $body,
        }
    };
}

/// Closed set of shape variants. Serializes as its portable record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ShapeRecord", try_from = "ShapeRecord")]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Line(Line),
    Arrow(Arrow),
    Text(Text),
    Star(Star),
    Triangle(Triangle),
    Polygon(Polygon),
    Connector(Connector),
    Group(Group),
    Image(Image),
    Path(Path),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        each_variant!(self, s => s.id())
    }

    /// Variant tag as written in portable records.
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Rectangle(_) => "rectangle",
            Shape::Circle(_) => "circle",
            Shape::Line(_) => "line",
            Shape::Arrow(_) => "arrow",
            Shape::Text(_) => "text",
            Shape::Star(_) => "star",
            Shape::Triangle(_) => "triangle",
            Shape::Polygon(_) => "polygon",
            Shape::Connector(_) => "connector",
            Shape::Group(_) => "group",
            Shape::Image(_) => "image",
            Shape::Path(_) => "path",
        }
    }

    /// Unrotated axis-aligned bounds in world space.
    ///
    /// Rotated shapes still report the box of their unrotated geometry; callers
    /// needing a tight box use [`Shape::rotated_bounds`].
    pub fn bounds(&self) -> Rect {
        each_variant!(self, s => s.bounds())
    }

    /// Box around the rotated outline.
    pub fn rotated_bounds(&self) -> Rect {
        let bounds = self.bounds();
        let rotation = self.rotation();
        if rotation == 0.0 {
            return bounds;
        }
        let center = bounds.center();
        let corners = [
            Point::new(bounds.x0, bounds.y0),
            Point::new(bounds.x1, bounds.y0),
            Point::new(bounds.x1, bounds.y1),
            Point::new(bounds.x0, bounds.y1),
        ];
        points_bounds(corners.map(|c| rotate_point(c, center, rotation)), center)
    }

    /// Rotation pivot: the center of the unrotated bounds.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Rotation in degrees about [`Shape::center`].
    pub fn rotation(&self) -> f64 {
        match self {
            Shape::Rectangle(s) => s.rotation,
            Shape::Circle(s) => s.rotation,
            Shape::Line(s) => s.rotation,
            Shape::Arrow(s) => s.rotation,
            Shape::Text(s) => s.rotation,
            Shape::Star(s) => s.rotation,
            Shape::Triangle(s) => s.rotation,
            Shape::Polygon(s) => s.rotation,
            Shape::Group(s) => s.rotation,
            Shape::Image(s) => s.rotation,
            Shape::Path(s) => s.rotation,
            Shape::Connector(_) => 0.0,
        }
    }

    /// Set the rotation in degrees. Connectors ignore rotation.
    pub fn set_rotation(&mut self, degrees: f64) {
        let degrees = normalize_degrees(degrees);
        match self {
            Shape::Rectangle(s) => s.rotation = degrees,
            Shape::Circle(s) => s.rotation = degrees,
            Shape::Line(s) => s.rotation = degrees,
            Shape::Arrow(s) => s.rotation = degrees,
            Shape::Text(s) => s.rotation = degrees,
            Shape::Star(s) => s.rotation = degrees,
            Shape::Triangle(s) => s.rotation = degrees,
            Shape::Polygon(s) => s.rotation = degrees,
            Shape::Group(s) => s.rotation = degrees,
            Shape::Image(s) => s.rotation = degrees,
            Shape::Path(s) => s.rotation = degrees,
            Shape::Connector(_) => {}
        }
    }

    /// Check if this shape supports rotation.
    pub fn supports_rotation(&self) -> bool {
        !matches!(self, Shape::Connector(_))
    }

    /// Point containment, honouring rotation.
    pub fn contains_point(&self, point: Point) -> bool {
        let local = rotate_point(point, self.center(), -self.rotation());
        each_variant!(self, s => s.contains_local(local))
    }

    /// World-space outline with rotation applied.
    pub fn to_path(&self) -> BezPath {
        let mut path = each_variant!(self, s => s.local_path());
        let rotation = self.rotation();
        if rotation != 0.0 {
            path.apply_affine(Affine::rotate_about(rotation.to_radians(), self.center()));
        }
        path
    }

    pub fn style(&self) -> &ShapeStyle {
        each_variant!(self, s => s.style())
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        each_variant!(self, s => s.style_mut())
    }

    pub fn is_visible(&self) -> bool {
        self.style().visible
    }

    pub fn translate(&mut self, delta: Vec2) {
        each_variant!(self, s => s.translate(delta))
    }

    /// Rigidly rotate the shape about an external pivot.
    pub fn rotate_about(&mut self, pivot: Point, degrees: f64) {
        if degrees == 0.0 || !self.supports_rotation() {
            return;
        }
        let center = self.center();
        let moved = rotate_point(center, pivot, degrees);
        self.translate(moved - center);
        self.set_rotation(self.rotation() + degrees);
    }

    /// Get the group if this shape is a group.
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Get the connector if this shape is one.
    pub fn as_connector(&self) -> Option<&Connector> {
        match self {
            Shape::Connector(c) => Some(c),
            _ => None,
        }
    }

    /// Whether this shape is a connector attached to `id`.
    pub fn references(&self, id: ShapeId) -> bool {
        self.as_connector().is_some_and(|c| c.from == id || c.to == id)
    }

    /// Convert to the portable record.
    pub fn to_record(&self) -> ShapeRecord {
        ShapeRecord::from(self.clone())
    }

    /// Rebuild a shape from a portable record.
    pub fn from_record(record: ShapeRecord) -> ShapeResult<Shape> {
        Shape::try_from(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flattened subpaths of the rotated outline.
    fn outline(shape: &Shape) -> Vec<Vec<Point>> {
        let mut subpaths: Vec<Vec<Point>> = Vec::new();
        kurbo::flatten(shape.to_path().elements().iter().copied(), 0.05, |el| match el {
            kurbo::PathEl::MoveTo(p) => subpaths.push(vec![p]),
            kurbo::PathEl::LineTo(p) => {
                if let Some(current) = subpaths.last_mut() {
                    current.push(p);
                }
            }
            _ => {}
        });
        subpaths
    }

    /// Brute-force containment: ray cast against every closed outline.
    fn brute_force_contains(shape: &Shape, point: Point) -> bool {
        outline(shape)
            .iter()
            .any(|polygon| point_in_polygon(point, polygon))
    }

    /// Brute-force distance to a polyline by dense sampling.
    fn sampled_distance(points: &[Point], point: Point, closed: bool) -> f64 {
        let mut segments: Vec<(Point, Point)> = points.windows(2).map(|w| (w[0], w[1])).collect();
        if closed && points.len() > 2 {
            segments.push((points[points.len() - 1], points[0]));
        }
        let mut best = f64::INFINITY;
        for (a, b) in segments {
            for i in 0..=256 {
                let sample = a.lerp(b, f64::from(i) / 256.0);
                best = best.min((point - sample).hypot());
            }
        }
        best
    }

    /// Points on a grid covering the (rotated) bounds plus a margin.
    fn grid_around(shape: &Shape, margin: f64, step: f64) -> Vec<Point> {
        let bounds = shape.rotated_bounds().inflate(margin, margin);
        let mut points = Vec::new();
        let mut y = bounds.y0;
        while y <= bounds.y1 {
            let mut x = bounds.x0;
            while x <= bounds.x1 {
                points.push(Point::new(x, y));
                x += step;
            }
            y += step;
        }
        points
    }

    fn closed_shapes() -> Vec<Shape> {
        vec![
            Shape::Rectangle(Rectangle::new(Point::new(10.0, 20.0), 80.0, 40.0)),
            Shape::Circle(Circle::new(Point::new(-30.0, 5.0), 25.0)),
            Shape::Star(Star::new(Point::new(0.0, 0.0), 50.0, 25.0, 5)),
            Shape::Triangle(Triangle::new(Point::new(40.0, 40.0), 30.0)),
            Shape::Polygon(Polygon::regular(Point::new(5.0, 5.0), 40.0, 6)),
            Shape::Image(Image::new(Point::new(0.0, 0.0), 60.0, 30.0, String::new())),
            Shape::Text(Text::new(Point::new(12.0, -7.0), "Hello\nworld".to_string())),
            Shape::Group(Group::from_world(vec![
                Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 40.0, 40.0)),
                Shape::Circle(Circle::new(Point::new(30.0, 10.0), 20.0)),
            ])),
        ]
    }

    fn stroked_shapes() -> Vec<Shape> {
        let mut path = Path::new(Point::new(-20.0, 0.0));
        path.add_point(Point::new(0.0, 15.0));
        path.add_point(Point::new(25.0, -10.0));
        path.add_point(Point::new(40.0, 5.0));
        let mut thick = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 60.0));
        thick.style.stroke_width = 8.0;
        vec![
            Shape::Line(Line::new(Point::new(-30.0, -10.0), Point::new(50.0, 20.0))),
            Shape::Line(thick),
            Shape::Arrow(Arrow::new(Point::new(5.0, 5.0), Point::new(-40.0, 30.0))),
            Shape::Path(path),
        ]
    }

    #[test]
    fn test_contains_point_agrees_with_ray_cast() {
        for rotation in [0.0, 30.0, 90.0, 211.0] {
            for mut shape in closed_shapes() {
                shape.set_rotation(rotation);
                let center = shape.center();
                assert!(shape.contains_point(center), "{} center", shape.type_name());
                assert_eq!(shape.contains_point(center), brute_force_contains(&shape, center));

                let far = Point::new(shape.bounds().x1 + 500.0, shape.bounds().y1 + 500.0);
                assert!(!shape.contains_point(far), "{} far", shape.type_name());
                assert_eq!(shape.contains_point(far), brute_force_contains(&shape, far));
            }
        }
    }

    #[test]
    fn test_contains_point_matches_outline_on_grid() {
        for rotation in [0.0, 30.0, 90.0, 211.0] {
            // Stars hit-test on their outer radius, not the outline.
            for mut shape in closed_shapes()
                .into_iter()
                .filter(|s| !matches!(s, Shape::Star(_)))
            {
                shape.set_rotation(rotation);
                let outlines = outline(&shape);
                for point in grid_around(&shape, 10.0, 2.5) {
                    let edge = outlines
                        .iter()
                        .map(|o| sampled_distance(o, point, true))
                        .fold(f64::INFINITY, f64::min);
                    if edge < 0.5 {
                        continue;
                    }
                    assert_eq!(
                        shape.contains_point(point),
                        brute_force_contains(&shape, point),
                        "{} at {:?} rotated {}",
                        shape.type_name(),
                        point,
                        rotation
                    );
                }
            }
        }
    }

    #[test]
    fn test_stroked_hit_matches_outline_distance() {
        for rotation in [0.0, 30.0, 90.0, 211.0] {
            for mut shape in stroked_shapes() {
                shape.set_rotation(rotation);
                let tolerance = LINE_HIT_TOLERANCE + shape.style().stroke_width / 2.0;
                // First subpath only: an arrow's head is drawn but not hit.
                let outlines = outline(&shape);
                let body = &outlines[0];
                for point in grid_around(&shape, 15.0, 2.5) {
                    let distance = sampled_distance(body, point, false);
                    if (distance - tolerance).abs() < 0.25 {
                        continue;
                    }
                    assert_eq!(
                        shape.contains_point(point),
                        distance <= tolerance,
                        "{} at {:?} rotated {}",
                        shape.type_name(),
                        point,
                        rotation
                    );
                }
            }
        }
    }

    #[test]
    fn test_routed_connector_hit_matches_outline_distance() {
        let a = Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 20.0, 20.0));
        let b = Shape::Circle(Circle::new(Point::new(120.0, 70.0), 15.0));
        let connector = Shape::Connector(Connector::new(a.id(), b.id()));
        let id = connector.id();
        let mut scene = crate::scene::Scene::new();
        scene.add(a);
        scene.add(b);
        scene.add(connector);
        let shape = scene.get(id).unwrap().clone();
        let tolerance = LINE_HIT_TOLERANCE + shape.style().stroke_width / 2.0;
        let outlines = outline(&shape);
        assert_eq!(outlines.len(), 1);
        for point in grid_around(&shape, 15.0, 2.5) {
            let distance = sampled_distance(&outlines[0], point, false);
            if (distance - tolerance).abs() < 0.25 {
                continue;
            }
            assert_eq!(shape.contains_point(point), distance <= tolerance, "at {:?}", point);
        }
    }

    #[test]
    fn test_rotated_rectangle_hit() {
        let mut shape = Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 100.0, 10.0));
        assert!(shape.contains_point(Point::new(45.0, 0.0)));
        assert!(!shape.contains_point(Point::new(0.0, 45.0)));
        shape.set_rotation(90.0);
        assert!(!shape.contains_point(Point::new(45.0, 0.0)));
        assert!(shape.contains_point(Point::new(0.0, 45.0)));
        // Bounds stay unrotated.
        assert!((shape.bounds().width() - 100.0).abs() < f64::EPSILON);
        assert!((shape.rotated_bounds().height() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_about_pivot() {
        let mut shape = Shape::Circle(Circle::new(Point::new(10.0, 0.0), 5.0));
        shape.rotate_about(Point::ZERO, 90.0);
        let center = shape.center();
        assert!(center.x.abs() < 1e-9);
        assert!((center.y - 10.0).abs() < 1e-9);
        assert!((shape.rotation() - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_color_hex() {
        let color = SerializableColor::from_hex("#3b82f6").unwrap();
        assert_eq!(color, SerializableColor::new(0x3b, 0x82, 0xf6, 255));
        assert_eq!(color.to_hex(), "#3b82f6");
        assert_eq!(SerializableColor::from_hex("#fff").unwrap(), SerializableColor::white());
        assert_eq!(
            SerializableColor::from_hex("#00000080").unwrap().to_hex(),
            "#00000080"
        );
        assert!(SerializableColor::from_hex("red").is_err());
        assert!(SerializableColor::from_hex("#12345").is_err());
    }

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(370.0) - 10.0).abs() < 1e-9);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 1e-9);
        assert_eq!(normalize_degrees(360.0), 0.0);
    }

    #[test]
    fn test_point_in_polygon() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Point::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Point::new(15.0, 5.0), &square));
    }
}
