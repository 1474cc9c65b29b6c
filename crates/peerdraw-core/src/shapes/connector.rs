//! Connector shape linking two other shapes by identity.
//!
//! A connector owns no geometry of its own. The scene routes it before every
//! draw pass from the current bounds of both ends; until then, or when an
//! end no longer exists, it is dangling and neither drawn nor hit.

use super::{LINE_HIT_TOLERANCE, ShapeId, ShapeStyle, ShapeTrait, point_to_segment_dist};
use kurbo::{BezPath, Point, Rect, Vec2};
use uuid::Uuid;

/// Routed endpoints of a connector in world space.
pub type ConnectorRoute = (Point, Point);

#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub(crate) id: ShapeId,
    /// Shape the connector starts at.
    pub from: ShapeId,
    /// Shape the connector ends at.
    pub to: ShapeId,
    pub(crate) route: Option<ConnectorRoute>,
    pub style: ShapeStyle,
}

impl Connector {
    pub fn new(from: ShapeId, to: ShapeId) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            route: None,
            style: ShapeStyle::default(),
        }
    }

    /// Current route, `None` when dangling.
    pub fn route(&self) -> Option<ConnectorRoute> {
        self.route
    }

    pub fn is_dangling(&self) -> bool {
        self.route.is_none()
    }

    pub(crate) fn set_route(&mut self, route: Option<ConnectorRoute>) {
        self.route = route;
    }

    /// Side midpoints (top, right, bottom, left) usable as anchors.
    pub fn anchors(rect: Rect) -> [Point; 4] {
        let c = rect.center();
        [
            Point::new(c.x, rect.y0),
            Point::new(rect.x1, c.y),
            Point::new(c.x, rect.y1),
            Point::new(rect.x0, c.y),
        ]
    }

    /// Pick the anchor pair with the shortest straight-line distance.
    pub fn route_between(from: Rect, to: Rect) -> ConnectorRoute {
        let mut best = (from.center(), to.center());
        let mut best_dist = f64::INFINITY;
        for a in Self::anchors(from) {
            for b in Self::anchors(to) {
                let dist = (b - a).hypot2();
                if dist < best_dist {
                    best_dist = dist;
                    best = (a, b);
                }
            }
        }
        best
    }
}

impl ShapeTrait for Connector {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        match self.route {
            Some((a, b)) => Rect::from_points(a, b),
            None => Rect::ZERO,
        }
    }

    fn contains_local(&self, point: Point) -> bool {
        let Some((a, b)) = self.route else {
            return false;
        };
        let tolerance = LINE_HIT_TOLERANCE + self.style.stroke_width / 2.0;
        point_to_segment_dist(point, a, b) <= tolerance
    }

    fn local_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some((a, b)) = self.route {
            path.move_to(a);
            path.line_to(b);
        }
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    // Geometry follows the connected shapes.
    fn translate(&mut self, _delta: Vec2) {}
}
