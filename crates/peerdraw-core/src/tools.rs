//! Drawing tools and the shapes they produce.

use crate::config::EditorConfig;
use crate::shapes::{
    Arrow, Circle, Connector, Line, Path, Polygon, Rectangle, Shape, ShapeId, ShapeStyle, Star,
    Text, Triangle,
};
use crate::snap::snap_line_endpoint;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Content given to a freshly placed text shape.
pub const DEFAULT_TEXT: &str = "Text";

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Rectangle,
    Circle,
    Line,
    Arrow,
    Text,
    Star,
    Triangle,
    Polygon,
    Path,
    Connector,
}

impl ToolKind {
    /// Tools that create a new shape on pointer release.
    pub fn is_drawing(self) -> bool {
        !matches!(self, ToolKind::Select | ToolKind::Pan)
    }

    /// Single-key shortcut.
    pub fn from_shortcut(key: char) -> Option<ToolKind> {
        match key {
            'v' => Some(ToolKind::Select),
            'h' => Some(ToolKind::Pan),
            'r' => Some(ToolKind::Rectangle),
            'o' => Some(ToolKind::Circle),
            'l' => Some(ToolKind::Line),
            'a' => Some(ToolKind::Arrow),
            't' => Some(ToolKind::Text),
            's' => Some(ToolKind::Star),
            'p' => Some(ToolKind::Path),
            'c' => Some(ToolKind::Connector),
            _ => None,
        }
    }
}

/// Current tool plus the parameters new shapes are built with.
#[derive(Debug, Clone)]
pub struct ToolManager {
    pub current_tool: ToolKind,
    /// Style applied to new shapes.
    pub current_style: ShapeStyle,
    /// Corner radius for new rectangles (0 = sharp corners).
    pub corner_radius: f64,
    pub polygon_sides: usize,
    pub star_points: u32,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            current_tool: ToolKind::default(),
            current_style: ShapeStyle::default(),
            corner_radius: 0.0,
            polygon_sides: config.polygon_sides,
            star_points: config.star_points,
        }
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
    }

    /// Build the shape the current tool would produce for a drag from
    /// `start` to `end`. `points` is the recorded pointer trail, used by the
    /// path tool. With `constrain`, rectangles become squares and lines snap
    /// to 15° steps.
    ///
    /// Select, pan and connector tools return `None`.
    pub fn create_shape(
        &self,
        start: Point,
        end: Point,
        points: &[Point],
        constrain: bool,
    ) -> Option<Shape> {
        let radius = (end - start).hypot();
        let mut shape = match self.current_tool {
            ToolKind::Rectangle => {
                let end = if constrain { square_corner(start, end) } else { end };
                let mut rect = Rectangle::from_corners(start, end);
                rect.corner_radius = self.corner_radius;
                Shape::Rectangle(rect)
            }
            ToolKind::Circle => Shape::Circle(Circle::from_center_and_point(start, end)),
            ToolKind::Line => {
                let end = if constrain { snap_line_endpoint(start, end) } else { end };
                Shape::Line(Line::new(start, end))
            }
            ToolKind::Arrow => {
                let end = if constrain { snap_line_endpoint(start, end) } else { end };
                Shape::Arrow(Arrow::new(start, end))
            }
            ToolKind::Text => Shape::Text(Text::new(start, DEFAULT_TEXT.to_string())),
            ToolKind::Star => Shape::Star(Star::with_outer_radius(start, radius, self.star_points)),
            ToolKind::Triangle => Shape::Triangle(Triangle::new(start, radius)),
            ToolKind::Polygon => Shape::Polygon(Polygon::regular(start, radius, self.polygon_sides)),
            ToolKind::Path => {
                let mut path = Path::new(start);
                for point in points.iter().skip_while(|p| **p == start) {
                    path.add_point(*point);
                }
                Shape::Path(path)
            }
            ToolKind::Select | ToolKind::Pan | ToolKind::Connector => return None,
        };
        *shape.style_mut() = self.current_style.clone();
        Some(shape)
    }

    /// Connector between two existing shapes, in the current style.
    pub fn create_connector(&self, from: ShapeId, to: ShapeId) -> Shape {
        let mut connector = Connector::new(from, to);
        connector.style = self.current_style.clone();
        Shape::Connector(connector)
    }

    /// Straight-line stand-in shown while a connector is being dragged out.
    pub fn connector_preview(&self, start: Point, end: Point) -> Shape {
        let mut line = Line::new(start, end);
        line.style = self.current_style.clone();
        Shape::Line(line)
    }
}

/// Corner of the square spanned from `start` towards `end`.
fn square_corner(start: Point, end: Point) -> Point {
    let d = end - start;
    let side = d.x.abs().max(d.y.abs());
    start + Vec2::new(side.copysign(d.x), side.copysign(d.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    #[test]
    fn test_tool_selection() {
        let mut tm = ToolManager::new();
        assert_eq!(tm.current_tool, ToolKind::Select);
        tm.set_tool(ToolKind::Rectangle);
        assert_eq!(tm.current_tool, ToolKind::Rectangle);
        assert!(tm.current_tool.is_drawing());
        assert!(!ToolKind::Pan.is_drawing());
        assert_eq!(ToolKind::from_shortcut('o'), Some(ToolKind::Circle));
    }

    #[test]
    fn test_rectangle_from_drag() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Rectangle);
        let shape = tm
            .create_shape(Point::new(100.0, 50.0), Point::new(0.0, 0.0), &[], false)
            .unwrap();
        assert_eq!(shape.bounds(), Rect::new(0.0, 0.0, 100.0, 50.0));

        let square = tm
            .create_shape(Point::ZERO, Point::new(-40.0, 10.0), &[], true)
            .unwrap();
        assert_eq!(square.bounds(), Rect::new(-40.0, 0.0, 0.0, 40.0));
    }

    #[test]
    fn test_radial_tools_use_drag_distance() {
        let mut tm = ToolManager::new();
        for tool in [ToolKind::Circle, ToolKind::Star, ToolKind::Polygon] {
            tm.set_tool(tool);
            let shape = tm
                .create_shape(Point::ZERO, Point::new(30.0, 40.0), &[], false)
                .unwrap();
            assert!((shape.bounds().height() - 100.0).abs() < 1e-9, "{tool:?}");
        }
    }

    #[test]
    fn test_constrained_line() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Line);
        let Some(Shape::Line(line)) = tm.create_shape(Point::ZERO, Point::new(100.0, 3.0), &[], true)
        else {
            panic!("expected a line");
        };
        assert!(line.end.y.abs() < 1e-9);
    }

    #[test]
    fn test_path_from_trail() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Path);
        let trail = [Point::ZERO, Point::new(5.0, 5.0), Point::new(10.0, 0.0)];
        let Some(Shape::Path(path)) = tm.create_shape(Point::ZERO, trail[2], &trail, false) else {
            panic!("expected a path");
        };
        assert_eq!(path.absolute_points(), trail.to_vec());
    }

    #[test]
    fn test_non_drawing_tools() {
        let mut tm = ToolManager::new();
        for tool in [ToolKind::Select, ToolKind::Pan, ToolKind::Connector] {
            tm.set_tool(tool);
            assert!(tm.create_shape(Point::ZERO, Point::new(9.0, 9.0), &[], false).is_none());
        }
    }

    #[test]
    fn test_style_applied() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Text);
        tm.current_style.stroke_width = 7.0;
        let shape = tm.create_shape(Point::ZERO, Point::ZERO, &[], false).unwrap();
        assert!((shape.style().stroke_width - 7.0).abs() < f64::EPSILON);
    }
}
