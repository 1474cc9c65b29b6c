//! Snapping of points to the grid, to other shapes and to angle increments.

use crate::shapes::{Shape, ShapeId, normalize_degrees};
use kurbo::{Point, Rect, Vec2};

/// Angle snap increment in degrees, used for rotation and line drawing with shift.
pub const ANGLE_SNAP_INCREMENT: f64 = 15.0;

/// Snap mode for aligning shapes to grid or other elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapMode {
    /// No snapping.
    #[default]
    None,
    /// Snap to grid intersections.
    Grid,
    /// Snap to other shapes' corners, edge midpoints and centers.
    Shapes,
    /// Shapes first, then grid.
    All,
}

impl SnapMode {
    /// Cycle to the next snap mode.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Grid,
            SnapMode::Grid => SnapMode::Shapes,
            SnapMode::Shapes => SnapMode::All,
            SnapMode::All => SnapMode::None,
        }
    }

    pub fn snaps_to_grid(self) -> bool {
        matches!(self, SnapMode::Grid | SnapMode::All)
    }

    pub fn snaps_to_shapes(self) -> bool {
        matches!(self, SnapMode::Shapes | SnapMode::All)
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Shape target that won, if any.
    pub target: Option<SnapTarget>,
    pub snapped: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            target: None,
            snapped: false,
        }
    }
}

/// A point that can be snapped to on a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub point: Point,
    pub kind: SnapTargetKind,
}

/// Type of snap target, for visual feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapTargetKind {
    Corner,
    Midpoint,
    Center,
}

/// Snap an angle to the nearest increment, in `[0, 360)`.
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    normalize_degrees((angle_degrees / increment).round() * increment)
}

/// Rotate `end` around `start` onto the nearest angle increment, keeping its distance.
pub fn snap_line_endpoint(start: Point, end: Point) -> Point {
    let d = end - start;
    let distance = d.hypot();
    if distance < 0.001 {
        return end;
    }
    let snapped = snap_angle(d.atan2().to_degrees(), ANGLE_SNAP_INCREMENT).to_radians();
    start + Vec2::from_angle(snapped) * distance
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    if grid_size <= 0.0 {
        return SnapResult::none(point);
    }
    SnapResult {
        point: Point::new(
            (point.x / grid_size).round() * grid_size,
            (point.y / grid_size).round() * grid_size,
        ),
        target: None,
        snapped: true,
    }
}

/// Corners, edge midpoints and center of a box.
pub fn targets_from_bounds(bounds: Rect) -> Vec<SnapTarget> {
    let c = bounds.center();
    let corner = |x, y| SnapTarget {
        point: Point::new(x, y),
        kind: SnapTargetKind::Corner,
    };
    let mid = |x, y| SnapTarget {
        point: Point::new(x, y),
        kind: SnapTargetKind::Midpoint,
    };
    vec![
        corner(bounds.x0, bounds.y0),
        corner(bounds.x1, bounds.y0),
        corner(bounds.x1, bounds.y1),
        corner(bounds.x0, bounds.y1),
        mid(c.x, bounds.y0),
        mid(bounds.x1, c.y),
        mid(c.x, bounds.y1),
        mid(bounds.x0, c.y),
        SnapTarget {
            point: c,
            kind: SnapTargetKind::Center,
        },
    ]
}

/// Snap targets offered by a shape. Lines and arrows offer their endpoints
/// and midpoint; connectors offer nothing.
pub fn targets_for_shape(shape: &Shape) -> Vec<SnapTarget> {
    let endpoints = |start: Point, end: Point| {
        vec![
            SnapTarget {
                point: start,
                kind: SnapTargetKind::Corner,
            },
            SnapTarget {
                point: end,
                kind: SnapTargetKind::Corner,
            },
            SnapTarget {
                point: start.midpoint(end),
                kind: SnapTargetKind::Midpoint,
            },
        ]
    };
    match shape {
        Shape::Connector(_) => Vec::new(),
        Shape::Line(l) if l.rotation == 0.0 => endpoints(l.start, l.end),
        Shape::Arrow(a) if a.rotation == 0.0 => endpoints(a.start, a.end),
        other => targets_from_bounds(other.rotated_bounds()),
    }
}

/// Collect targets from every visible shape not in `exclude`.
pub fn collect_targets<'a>(
    shapes: impl IntoIterator<Item = &'a Shape>,
    exclude: &[ShapeId],
) -> Vec<SnapTarget> {
    shapes
        .into_iter()
        .filter(|s| s.is_visible() && !exclude.contains(&s.id()))
        .flat_map(targets_for_shape)
        .collect()
}

/// Snap a point to the nearest shape snap target within `threshold`.
pub fn snap_to_shapes(point: Point, targets: &[SnapTarget], threshold: f64) -> SnapResult {
    let mut best: Option<&SnapTarget> = None;
    let mut best_dist_sq = threshold * threshold;
    for target in targets {
        let dist_sq = (point - target.point).hypot2();
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best = Some(target);
        }
    }
    match best {
        Some(target) => SnapResult {
            point: target.point,
            target: Some(*target),
            snapped: true,
        },
        None => SnapResult::none(point),
    }
}

/// Snap a point according to `mode`. Shape targets win over the grid.
pub fn snap_point(
    point: Point,
    mode: SnapMode,
    grid_size: f64,
    targets: &[SnapTarget],
    threshold: f64,
) -> SnapResult {
    if mode.snaps_to_shapes() {
        let result = snap_to_shapes(point, targets, threshold);
        if result.snapped {
            return result;
        }
    }
    if mode.snaps_to_grid() {
        return snap_to_grid(point, grid_size);
    }
    SnapResult::none(point)
}
