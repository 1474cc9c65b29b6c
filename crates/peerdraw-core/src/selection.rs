//! Selection handles and the resize/rotate math behind them.
//!
//! All transforms are computed from the shape as it was when the gesture
//! started plus the total pointer travel, so repeated pointer-move events
//! never accumulate error.

use crate::shapes::{Shape, rotate_point};
use crate::snap::{ANGLE_SNAP_INCREMENT, snap_angle};
use kurbo::{Point, Rect, Vec2};

/// Smallest width or height a box resize can produce.
pub const MIN_RESIZE_SIZE: f64 = 1.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Corner(Corner),
    Edge(Edge),
    /// Rotation handle above the top edge.
    Rotate,
}

impl HandleKind {
    /// Side of the unit box the handle sits on, per axis (-1, 0 or 1).
    pub fn direction(self) -> (f64, f64) {
        match self {
            HandleKind::Corner(Corner::TopLeft) => (-1.0, -1.0),
            HandleKind::Corner(Corner::TopRight) => (1.0, -1.0),
            HandleKind::Corner(Corner::BottomLeft) => (-1.0, 1.0),
            HandleKind::Corner(Corner::BottomRight) => (1.0, 1.0),
            HandleKind::Edge(Edge::Top) => (0.0, -1.0),
            HandleKind::Edge(Edge::Right) => (1.0, 0.0),
            HandleKind::Edge(Edge::Bottom) => (0.0, 1.0),
            HandleKind::Edge(Edge::Left) => (-1.0, 0.0),
            HandleKind::Rotate => (0.0, -1.0),
        }
    }

    pub fn is_resize(self) -> bool {
        !matches!(self, HandleKind::Rotate)
    }
}

const RESIZE_HANDLES: [HandleKind; 8] = [
    HandleKind::Corner(Corner::TopLeft),
    HandleKind::Corner(Corner::TopRight),
    HandleKind::Corner(Corner::BottomLeft),
    HandleKind::Corner(Corner::BottomRight),
    HandleKind::Edge(Edge::Top),
    HandleKind::Edge(Edge::Right),
    HandleKind::Edge(Edge::Bottom),
    HandleKind::Edge(Edge::Left),
];

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in world coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a world point hits this handle. `tolerance` is in world units.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Whether a shape gets the eight resize handles.
pub fn supports_resize(shape: &Shape) -> bool {
    !matches!(shape, Shape::Group(_) | Shape::Connector(_))
}

/// Handles for a single selected shape, placed in its rotated frame.
/// `rotate_offset` is the rotate handle's distance above the top edge in
/// world units.
pub fn get_handles(shape: &Shape, rotate_offset: f64) -> Vec<Handle> {
    if !shape.supports_rotation() {
        return Vec::new();
    }
    let bounds = shape.bounds();
    let center = bounds.center();
    let rotation = shape.rotation();
    let (half_w, half_h) = (bounds.width() / 2.0, bounds.height() / 2.0);
    let place = |dx: f64, dy: f64| rotate_point(center + Vec2::new(dx, dy), center, rotation);

    let mut handles = Vec::with_capacity(9);
    if supports_resize(shape) {
        for kind in RESIZE_HANDLES {
            let (hx, hy) = kind.direction();
            handles.push(Handle::new(place(hx * half_w, hy * half_h), kind));
        }
    }
    handles.push(Handle::new(place(0.0, -half_h - rotate_offset), HandleKind::Rotate));
    handles
}

/// Find which handle (if any) is hit. Resize handles win over the rotate handle.
pub fn hit_test_handles(
    shape: &Shape,
    point: Point,
    tolerance: f64,
    rotate_offset: f64,
) -> Option<HandleKind> {
    let handles = get_handles(shape, rotate_offset);
    handles
        .iter()
        .filter(|h| h.kind.is_resize())
        .chain(handles.iter().filter(|h| !h.kind.is_resize()))
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// New unrotated world box for a box resize.
///
/// The pointer travel is mapped into the shape's rotated frame, the handle's
/// sides move while the opposite sides stay put, and the result is mapped
/// back so the anchor stays fixed on screen.
pub fn resized_box(
    bounds: Rect,
    rotation: f64,
    handle: HandleKind,
    travel: Vec2,
    keep_aspect_ratio: bool,
) -> Rect {
    let center = bounds.center();
    let local = rotate_point(Point::ZERO + travel, Point::ZERO, -rotation).to_vec2();
    let (hx, hy) = handle.direction();
    let (w, h) = (bounds.width(), bounds.height());

    let mut new_w = w + hx * local.x;
    let mut new_h = h + hy * local.y;
    if keep_aspect_ratio && hx != 0.0 && hy != 0.0 && w > 0.0 && h > 0.0 {
        let (sx, sy) = (new_w / w, new_h / h);
        let s = sx.abs().max(sy.abs());
        new_w = s * w * sx.signum();
        new_h = s * h * sy.signum();
    }

    // Local box relative to the old center, anchored on the opposite side.
    let (half_w, half_h) = (w / 2.0, h / 2.0);
    let (x0, x1) = match hx {
        x if x > 0.0 => (-half_w, -half_w + new_w),
        x if x < 0.0 => (half_w - new_w, half_w),
        _ => (-half_w, half_w),
    };
    let (y0, y1) = match hy {
        y if y > 0.0 => (-half_h, -half_h + new_h),
        y if y < 0.0 => (half_h - new_h, half_h),
        _ => (-half_h, half_h),
    };
    let (x0, x1) = (x0.min(x1), x0.max(x1));
    let (y0, y1) = (y0.min(y1), y0.max(y1));
    let width = (x1 - x0).max(MIN_RESIZE_SIZE);
    let height = (y1 - y0).max(MIN_RESIZE_SIZE);

    let local_center = Point::new(x0 + width / 2.0, y0 + height / 2.0);
    let world_center = rotate_point(center + local_center.to_vec2(), center, rotation);
    Rect::from_center_size(world_center, (width, height))
}

fn remap(points: &[Point], from: Rect, to: Rect) -> Vec<Point> {
    let axis = |v: f64, a0: f64, a_len: f64, b0: f64, b_len: f64, b_mid: f64| {
        if a_len > f64::EPSILON {
            b0 + (v - a0) / a_len * b_len
        } else {
            b_mid + (v - (a0 + a_len / 2.0))
        }
    };
    let to_center = to.center();
    points
        .iter()
        .map(|p| {
            Point::new(
                axis(p.x, from.x0, from.width(), to.x0, to.width(), to_center.x),
                axis(p.y, from.y0, from.height(), to.y0, to.height(), to_center.y),
            )
        })
        .collect()
}

/// Resize `original` by dragging `handle` from `start` to `current`.
///
/// Groups and connectors come back unchanged.
pub fn resize_shape(
    original: &Shape,
    handle: HandleKind,
    start: Point,
    current: Point,
    keep_aspect_ratio: bool,
) -> Shape {
    let mut shape = original.clone();
    if !handle.is_resize() || !supports_resize(original) {
        return shape;
    }
    let travel = current - start;
    let bounds = original.bounds();
    let rotation = original.rotation();
    let center = bounds.center();

    match &mut shape {
        Shape::Circle(circle) => {
            let (hx, hy) = handle.direction();
            let dir = Vec2::new(hx, hy).normalize();
            let world_dir = rotate_point(Point::ZERO + dir, Point::ZERO, rotation).to_vec2();
            circle.radius = (circle.radius + travel.dot(world_dir)).max(MIN_RESIZE_SIZE);
        }
        Shape::Star(star) => {
            let amount = signed_distance(center, start, current);
            let (outer, inner) = (star.outer_radius, star.inner_radius);
            star.grow(outer, inner, amount);
        }
        Shape::Triangle(tri) => {
            tri.size = (tri.size + signed_distance(center, start, current)).max(MIN_RESIZE_SIZE);
        }
        Shape::Rectangle(rect) => {
            rect.set_rect(resized_box(bounds, rotation, handle, travel, keep_aspect_ratio));
        }
        Shape::Image(image) => {
            image.set_rect(resized_box(bounds, rotation, handle, travel, keep_aspect_ratio));
        }
        Shape::Text(text) => {
            // Font size follows the height; width follows from the content.
            let target = resized_box(bounds, rotation, handle, travel, true);
            if bounds.height() > 0.0 {
                text.scale_font(target.height() / bounds.height());
            }
            text.center = target.center();
        }
        Shape::Line(line) => {
            let target = resized_box(bounds, rotation, handle, travel, keep_aspect_ratio);
            if let [start, end] = remap(&[line.start, line.end], bounds, target)[..] {
                line.start = start;
                line.end = end;
            }
        }
        Shape::Arrow(arrow) => {
            let target = resized_box(bounds, rotation, handle, travel, keep_aspect_ratio);
            if let [start, end] = remap(&[arrow.start, arrow.end], bounds, target)[..] {
                arrow.start = start;
                arrow.end = end;
            }
        }
        Shape::Path(path) => {
            let target = resized_box(bounds, rotation, handle, travel, keep_aspect_ratio);
            let points = remap(&path.absolute_points(), bounds, target);
            path.set_absolute_points(&points);
        }
        Shape::Polygon(poly) => {
            let target = resized_box(bounds, rotation, handle, travel, keep_aspect_ratio);
            let points = remap(&poly.absolute_vertices(), bounds, target);
            poly.set_absolute_vertices(&points);
        }
        Shape::Group(_) | Shape::Connector(_) => {}
    }
    shape
}

/// Pointer travel as a scalar, positive when moving away from `center`.
fn signed_distance(center: Point, start: Point, current: Point) -> f64 {
    let distance = (current - start).hypot();
    if (current - center).hypot() >= (start - center).hypot() {
        distance
    } else {
        -distance
    }
}

/// Rotate `original` by the angle the pointer swept around its center.
pub fn rotate_shape(original: &Shape, start: Point, current: Point, snap: bool) -> Shape {
    let mut shape = original.clone();
    if !original.supports_rotation() {
        return shape;
    }
    let center = original.center();
    let swept = (current - center).atan2() - (start - center).atan2();
    let mut rotation = original.rotation() + swept.to_degrees();
    if snap {
        rotation = snap_angle(rotation, ANGLE_SNAP_INCREMENT);
    }
    shape.set_rotation(rotation);
    shape
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Connector, Group, Line, Rectangle, Star, Text};
    use uuid::Uuid;

    fn square() -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0))
    }

    fn assert_rect(shape: &Shape, cx: f64, cy: f64, w: f64, h: f64) {
        let b = shape.bounds();
        assert!((b.center().x - cx).abs() < 1e-9, "cx {}", b.center().x);
        assert!((b.center().y - cy).abs() < 1e-9, "cy {}", b.center().y);
        assert!((b.width() - w).abs() < 1e-9, "w {}", b.width());
        assert!((b.height() - h).abs() < 1e-9, "h {}", b.height());
    }

    #[test]
    fn test_handles_count() {
        assert_eq!(get_handles(&square(), 25.0).len(), 9);
        let group = Shape::Group(Group::from_world(vec![square()]));
        let handles = get_handles(&group, 25.0);
        assert_eq!(handles.len(), 1);
        assert_eq!(handles[0].kind, HandleKind::Rotate);
        let conn = Shape::Connector(Connector::new(Uuid::new_v4(), Uuid::new_v4()));
        assert!(get_handles(&conn, 25.0).is_empty());
    }

    #[test]
    fn test_hit_test_handles() {
        let shape = square();
        assert_eq!(
            hit_test_handles(&shape, Point::new(51.0, 49.0), 8.0, 25.0),
            Some(HandleKind::Corner(Corner::BottomRight))
        );
        assert_eq!(
            hit_test_handles(&shape, Point::new(0.0, -75.0), 8.0, 25.0),
            Some(HandleKind::Rotate)
        );
        assert_eq!(hit_test_handles(&shape, Point::new(0.0, 0.0), 8.0, 25.0), None);
    }

    #[test]
    fn test_rotated_handles_follow_rotation() {
        let mut shape = square();
        shape.set_rotation(90.0);
        // Top edge handle of a shape rotated 90° sits on the right.
        let handles = get_handles(&shape, 25.0);
        let top = handles.iter().find(|h| h.kind == HandleKind::Edge(Edge::Top)).unwrap();
        assert!((top.position.x - 50.0).abs() < 1e-9);
        assert!(top.position.y.abs() < 1e-9);
    }

    #[test]
    fn test_corner_resize_keeps_opposite_corner() {
        let resized = resize_shape(
            &square(),
            HandleKind::Corner(Corner::BottomRight),
            Point::new(50.0, 50.0),
            Point::new(70.0, 70.0),
            false,
        );
        assert_rect(&resized, 10.0, 10.0, 120.0, 120.0);
    }

    #[test]
    fn test_edge_resize_one_axis() {
        let resized = resize_shape(
            &square(),
            HandleKind::Edge(Edge::Left),
            Point::new(-50.0, 0.0),
            Point::new(-70.0, 30.0),
            false,
        );
        assert_rect(&resized, -10.0, 0.0, 120.0, 100.0);
    }

    #[test]
    fn test_resize_flip_normalizes() {
        let resized = resize_shape(
            &square(),
            HandleKind::Edge(Edge::Right),
            Point::new(50.0, 0.0),
            Point::new(-90.0, 0.0),
            false,
        );
        // Right edge dragged past the left edge at -50.
        assert_rect(&resized, -70.0, 0.0, 40.0, 100.0);
    }

    #[test]
    fn test_resize_min_size() {
        let resized = resize_shape(
            &square(),
            HandleKind::Edge(Edge::Right),
            Point::new(50.0, 0.0),
            Point::new(-50.0, 0.0),
            false,
        );
        assert!((resized.bounds().width() - MIN_RESIZE_SIZE).abs() < 1e-9);
    }

    #[test]
    fn test_aspect_lock() {
        let rect = Shape::Rectangle(Rectangle::new(Point::ZERO, 100.0, 50.0));
        let resized = resize_shape(
            &rect,
            HandleKind::Corner(Corner::BottomRight),
            Point::new(50.0, 25.0),
            Point::new(150.0, 30.0),
            true,
        );
        let b = resized.bounds();
        assert!((b.width() - 200.0).abs() < 1e-9);
        assert!((b.height() - 100.0).abs() < 1e-9);
        // Top-left anchor stays.
        assert!((b.x0 + 50.0).abs() < 1e-9);
        assert!((b.y0 + 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_resize_anchor_fixed() {
        let mut shape = square();
        shape.set_rotation(90.0);
        let before = get_handles(&shape, 25.0)
            .into_iter()
            .find(|h| h.kind == HandleKind::Corner(Corner::TopLeft))
            .unwrap()
            .position;
        let br = get_handles(&shape, 25.0)
            .into_iter()
            .find(|h| h.kind == HandleKind::Corner(Corner::BottomRight))
            .unwrap()
            .position;
        let resized = resize_shape(
            &shape,
            HandleKind::Corner(Corner::BottomRight),
            br,
            br + Vec2::new(-20.0, 20.0),
            false,
        );
        let after = get_handles(&resized, 25.0)
            .into_iter()
            .find(|h| h.kind == HandleKind::Corner(Corner::TopLeft))
            .unwrap()
            .position;
        assert!((before - after).hypot() < 1e-9);
        assert!((resized.bounds().width() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_circle_resize_projects_on_handle() {
        let circle = Shape::Circle(Circle::new(Point::ZERO, 50.0));
        let resized = resize_shape(
            &circle,
            HandleKind::Edge(Edge::Right),
            Point::new(50.0, 0.0),
            Point::new(60.0, 40.0),
            false,
        );
        assert_rect(&resized, 0.0, 0.0, 120.0, 120.0);
    }

    #[test]
    fn test_star_resize_signed() {
        let star = Shape::Star(Star::new(Point::ZERO, 50.0, 25.0, 5));
        let grown = resize_shape(
            &star,
            HandleKind::Corner(Corner::TopRight),
            Point::new(50.0, -50.0),
            Point::new(53.0, -54.0),
            false,
        );
        let Shape::Star(s) = &grown else { panic!() };
        assert!((s.outer_radius - 55.0).abs() < 1e-9);
        let shrunk = resize_shape(
            &star,
            HandleKind::Corner(Corner::TopRight),
            Point::new(50.0, -50.0),
            Point::new(47.0, -46.0),
            false,
        );
        let Shape::Star(s) = &shrunk else { panic!() };
        assert!((s.outer_radius - 45.0).abs() < 1e-9);
        assert!((s.inner_radius - 22.5).abs() < 1e-9);
    }

    #[test]
    fn test_line_remap() {
        let line = Shape::Line(Line::new(Point::new(0.0, 0.0), Point::new(100.0, 50.0)));
        let resized = resize_shape(
            &line,
            HandleKind::Corner(Corner::BottomRight),
            Point::new(100.0, 50.0),
            Point::new(200.0, 100.0),
            false,
        );
        let Shape::Line(l) = &resized else { panic!() };
        assert!((l.start - Point::ZERO).hypot() < 1e-9);
        assert!((l.end - Point::new(200.0, 100.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_text_resize_scales_font() {
        let text = Shape::Text(Text::new(Point::ZERO, "Hello".to_string()));
        let h = text.bounds().height();
        let resized = resize_shape(
            &text,
            HandleKind::Edge(Edge::Bottom),
            Point::new(0.0, h / 2.0),
            Point::new(0.0, h / 2.0 + h),
            false,
        );
        let Shape::Text(t) = &resized else { panic!() };
        assert!((t.font_size - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_group_resize_is_noop() {
        let group = Shape::Group(Group::from_world(vec![square()]));
        let resized = resize_shape(
            &group,
            HandleKind::Corner(Corner::BottomRight),
            Point::new(50.0, 50.0),
            Point::new(90.0, 90.0),
            false,
        );
        assert_eq!(resized, group);
    }

    #[test]
    fn test_rotate_shape() {
        let shape = square();
        let rotated = rotate_shape(&shape, Point::new(0.0, -100.0), Point::new(100.0, 0.0), false);
        assert!((rotated.rotation() - 90.0).abs() < 1e-9);

        let snapped = rotate_shape(&shape, Point::new(0.0, -100.0), Point::new(100.0, -90.0), true);
        // atan2 sweep ≈ 48°, snapped to 45°.
        assert!((snapped.rotation() - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_adds_to_initial() {
        let mut shape = square();
        shape.set_rotation(30.0);
        let rotated = rotate_shape(&shape, Point::new(100.0, 0.0), Point::new(0.0, 100.0), false);
        assert!((rotated.rotation() - 120.0).abs() < 1e-9);
    }
}
