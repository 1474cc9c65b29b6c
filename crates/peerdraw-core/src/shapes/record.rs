//! Portable shape records and property patches.
//!
//! A record is the flat JSON form a shape takes in project files and wire
//! messages:
//!
//! ```json
//! { "id": "…", "type": "rectangle", "x": 0, "y": 0, "rotation": 0,
//!   "fillColor": null, "strokeColor": "#000000", "strokeWidth": 2,
//!   "opacity": 1, "cornerRadius": 0, "visible": true,
//!   "width": 100, "height": 50 }
//! ```
//!
//! `x`/`y` is the center for closed shapes, the start point for lines and
//! arrows, and the origin for polygons, paths and groups. Connectors carry
//! no position and always write `0`.

use super::{
    Arrow, Circle, Connector, Group, Image, Line, Path, Polygon, Rectangle, SerializableColor,
    Shape, ShapeError, ShapeId, ShapeResult, ShapeStyle, Star, Text, Triangle, normalize_degrees,
    polygon::MIN_POLYGON_VERTICES, star::MAX_STAR_POINTS, star::MIN_STAR_POINTS,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_stroke_color() -> SerializableColor {
    SerializableColor::black()
}

fn default_head_size() -> f64 {
    super::arrow::DEFAULT_HEAD_SIZE
}

/// Portable form of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    pub id: ShapeId,
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub fill_color: Option<SerializableColor>,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: SerializableColor,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub corner_radius: f64,
    #[serde(default = "default_true")]
    pub visible: bool,
}

/// Variant tag plus the fields specific to that variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Geometry {
    Rectangle {
        width: f64,
        height: f64,
    },
    Circle {
        radius: f64,
    },
    Line {
        x2: f64,
        y2: f64,
    },
    Arrow {
        x2: f64,
        y2: f64,
        #[serde(default = "default_head_size")]
        head_size: f64,
    },
    Text {
        text: String,
        font_size: f64,
        font_family: String,
    },
    Star {
        outer_radius: f64,
        inner_radius: f64,
        points: u32,
    },
    Triangle {
        size: f64,
    },
    /// Vertices relative to `x`/`y`.
    Polygon {
        points: Vec<Point>,
    },
    Connector {
        from: ShapeId,
        to: ShapeId,
    },
    /// Children in group-local coordinates.
    Group {
        children: Vec<ShapeRecord>,
    },
    Image {
        width: f64,
        height: f64,
        src: String,
    },
    /// Points relative to `x`/`y`.
    Path {
        points: Vec<Point>,
    },
}

impl ShapeRecord {
    /// Record as a JSON object map.
    pub fn to_map(&self) -> ShapeResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(ShapeError::InvalidRecord(format!(
                "record serialized to non-object {other}"
            ))),
        }
    }

    pub fn from_map(map: Map<String, Value>) -> ShapeResult<Self> {
        Ok(serde_json::from_value(Value::Object(map))?)
    }

    pub fn type_name(&self) -> &'static str {
        match self.geometry {
            Geometry::Rectangle { .. } => "rectangle",
            Geometry::Circle { .. } => "circle",
            Geometry::Line { .. } => "line",
            Geometry::Arrow { .. } => "arrow",
            Geometry::Text { .. } => "text",
            Geometry::Star { .. } => "star",
            Geometry::Triangle { .. } => "triangle",
            Geometry::Polygon { .. } => "polygon",
            Geometry::Connector { .. } => "connector",
            Geometry::Group { .. } => "group",
            Geometry::Image { .. } => "image",
            Geometry::Path { .. } => "path",
        }
    }
}

impl From<Shape> for ShapeRecord {
    fn from(shape: Shape) -> Self {
        let id = shape.id();
        let rotation = shape.rotation();
        let style = shape.style().clone();
        let mut corner_radius = 0.0;
        let (geometry, position) = match shape {
            Shape::Rectangle(s) => {
                corner_radius = s.corner_radius;
                let geometry = Geometry::Rectangle {
                    width: s.width,
                    height: s.height,
                };
                (geometry, s.center)
            }
            Shape::Circle(s) => (Geometry::Circle { radius: s.radius }, s.center),
            Shape::Line(s) => {
                let geometry = Geometry::Line {
                    x2: s.end.x,
                    y2: s.end.y,
                };
                (geometry, s.start)
            }
            Shape::Arrow(s) => {
                let geometry = Geometry::Arrow {
                    x2: s.end.x,
                    y2: s.end.y,
                    head_size: s.head_size,
                };
                (geometry, s.start)
            }
            Shape::Text(s) => {
                let geometry = Geometry::Text {
                    text: s.content,
                    font_size: s.font_size,
                    font_family: s.font_family,
                };
                (geometry, s.center)
            }
            Shape::Star(s) => {
                let geometry = Geometry::Star {
                    outer_radius: s.outer_radius,
                    inner_radius: s.inner_radius,
                    points: s.points,
                };
                (geometry, s.center)
            }
            Shape::Triangle(s) => (Geometry::Triangle { size: s.size }, s.center),
            Shape::Polygon(s) => {
                let points = s.vertices.iter().map(|v| v.to_point()).collect();
                (Geometry::Polygon { points }, s.origin)
            }
            Shape::Connector(s) => {
                let geometry = Geometry::Connector {
                    from: s.from,
                    to: s.to,
                };
                (geometry, Point::ZERO)
            }
            Shape::Group(s) => {
                let children = s.children.into_iter().map(ShapeRecord::from).collect();
                (Geometry::Group { children }, s.origin)
            }
            Shape::Image(s) => {
                let geometry = Geometry::Image {
                    width: s.width,
                    height: s.height,
                    src: s.src,
                };
                (geometry, s.center)
            }
            Shape::Path(s) => {
                let points = s.points.iter().map(|v| v.to_point()).collect();
                (Geometry::Path { points }, s.origin)
            }
        };
        Self {
            id,
            geometry,
            x: position.x,
            y: position.y,
            rotation,
            fill_color: style.fill_color,
            stroke_color: style.stroke_color,
            stroke_width: style.stroke_width,
            opacity: style.opacity,
            corner_radius,
            visible: style.visible,
        }
    }
}

fn finite(name: &str, value: f64) -> ShapeResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ShapeError::InvalidRecord(format!("{name} is not a finite number")))
    }
}

fn size(name: &str, value: f64) -> ShapeResult<f64> {
    Ok(finite(name, value)?.max(0.0))
}

fn finite_points(name: &str, points: &[Point]) -> ShapeResult<()> {
    for p in points {
        finite(name, p.x)?;
        finite(name, p.y)?;
    }
    Ok(())
}

impl TryFrom<ShapeRecord> for Shape {
    type Error = ShapeError;

    fn try_from(record: ShapeRecord) -> Result<Self, Self::Error> {
        let id = record.id;
        let position = Point::new(finite("x", record.x)?, finite("y", record.y)?);
        let rotation = normalize_degrees(finite("rotation", record.rotation)?);
        let style = ShapeStyle {
            stroke_color: record.stroke_color,
            stroke_width: size("strokeWidth", record.stroke_width)?,
            fill_color: record.fill_color,
            opacity: finite("opacity", record.opacity)?.clamp(0.0, 1.0),
            visible: record.visible,
        };
        let corner_radius = size("cornerRadius", record.corner_radius)?;

        let shape = match record.geometry {
            Geometry::Rectangle { width, height } => Shape::Rectangle(Rectangle {
                id,
                center: position,
                width: size("width", width)?,
                height: size("height", height)?,
                corner_radius,
                rotation,
                style,
            }),
            Geometry::Circle { radius } => Shape::Circle(Circle {
                id,
                center: position,
                radius: size("radius", radius)?,
                rotation,
                style,
            }),
            Geometry::Line { x2, y2 } => Shape::Line(Line {
                id,
                start: position,
                end: Point::new(finite("x2", x2)?, finite("y2", y2)?),
                rotation,
                style,
            }),
            Geometry::Arrow { x2, y2, head_size } => Shape::Arrow(Arrow {
                id,
                start: position,
                end: Point::new(finite("x2", x2)?, finite("y2", y2)?),
                head_size: size("headSize", head_size)?,
                rotation,
                style,
            }),
            Geometry::Text {
                text,
                font_size,
                font_family,
            } => Shape::Text(Text {
                id,
                center: position,
                content: text,
                font_size: size("fontSize", font_size)?,
                font_family,
                rotation,
                style,
            }),
            Geometry::Star {
                outer_radius,
                inner_radius,
                points,
            } => Shape::Star(Star {
                id,
                center: position,
                outer_radius: size("outerRadius", outer_radius)?,
                inner_radius: size("innerRadius", inner_radius)?,
                points: points.clamp(MIN_STAR_POINTS, MAX_STAR_POINTS),
                rotation,
                style,
            }),
            Geometry::Triangle { size: s } => Shape::Triangle(Triangle {
                id,
                center: position,
                size: size("size", s)?,
                rotation,
                style,
            }),
            Geometry::Polygon { points } => {
                if points.len() < MIN_POLYGON_VERTICES {
                    return Err(ShapeError::InvalidRecord(format!(
                        "polygon needs at least {MIN_POLYGON_VERTICES} points, got {}",
                        points.len()
                    )));
                }
                finite_points("points", &points)?;
                Shape::Polygon(Polygon {
                    id,
                    origin: position,
                    vertices: points.into_iter().map(|p| p.to_vec2()).collect(),
                    rotation,
                    style,
                })
            }
            Geometry::Connector { from, to } => Shape::Connector(Connector {
                id,
                from,
                to,
                route: None,
                style,
            }),
            Geometry::Group { children } => Shape::Group(Group {
                id,
                origin: position,
                children: children
                    .into_iter()
                    .map(Shape::try_from)
                    .collect::<ShapeResult<Vec<_>>>()?,
                rotation,
                style,
            }),
            Geometry::Image { width, height, src } => Shape::Image(Image {
                id,
                center: position,
                width: size("width", width)?,
                height: size("height", height)?,
                src,
                rotation,
                style,
            }),
            Geometry::Path { points } => {
                if points.is_empty() {
                    return Err(ShapeError::InvalidRecord("path has no points".to_string()));
                }
                finite_points("points", &points)?;
                Shape::Path(Path {
                    id,
                    origin: position,
                    points: points.into_iter().map(|p| p.to_vec2()).collect(),
                    rotation,
                    style,
                })
            }
        };
        Ok(shape)
    }
}

/// A subset of record fields, keyed by their portable names.
///
/// Patches are shallow: applying one replaces whole top-level values. The
/// `id` key is never applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapePatch(pub Map<String, Value>);

impl ShapePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of one field.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Compute `(forward, inverse)` patches holding only the fields that
    /// differ between two records. Returns `None` when nothing changed.
    pub fn diff(before: &ShapeRecord, after: &ShapeRecord) -> ShapeResult<Option<(Self, Self)>> {
        let old = before.to_map()?;
        let new = after.to_map()?;
        let mut forward = Map::new();
        let mut inverse = Map::new();
        for key in old.keys().chain(new.keys()) {
            if key == "id" || forward.contains_key(key) {
                continue;
            }
            let a = old.get(key).cloned().unwrap_or(Value::Null);
            let b = new.get(key).cloned().unwrap_or(Value::Null);
            if a != b {
                forward.insert(key.clone(), b);
                inverse.insert(key.clone(), a);
            }
        }
        if forward.is_empty() {
            Ok(None)
        } else {
            Ok(Some((Self(forward), Self(inverse))))
        }
    }

    /// Shallow-merge into `record`, producing a new record.
    pub fn apply_to(&self, record: &ShapeRecord) -> ShapeResult<ShapeRecord> {
        let mut map = record.to_map()?;
        for (key, value) in &self.0 {
            if key != "id" {
                map.insert(key.clone(), value.clone());
            }
        }
        ShapeRecord::from_map(map)
    }

    /// Merge and validate, producing a shape.
    pub fn apply_to_shape(&self, shape: &Shape) -> ShapeResult<Shape> {
        Shape::try_from(self.apply_to(&shape.to_record())?)
    }
}
