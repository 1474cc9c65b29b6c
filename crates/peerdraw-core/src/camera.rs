//! View transform: pan offset plus zoom factor.

use crate::config::EditorConfig;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Pan offset as it appears in `sync` messages and project files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PanOffset {
    pub x: f64,
    pub y: f64,
}

impl From<Vec2> for PanOffset {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<PanOffset> for Vec2 {
    fn from(p: PanOffset) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// Maps world coordinates to the screen.
///
/// `screen = world * zoom + pan`. The pan and zoom travel in `sync` messages
/// and project files so a joining peer sees the same view.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Screen-space translation.
    pub pan: Vec2,
    /// Scale factor (1.0 = 100%).
    pub zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity camera with the configured zoom limits.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }

    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// World-to-screen transform, for renderers.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        self.transform() * world
    }

    /// Convert a screen-space length (handle radius, snap distance) to world units.
    pub fn screen_to_world_len(&self, len: f64) -> f64 {
        len / self.zoom
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Zoom by `factor`, keeping the world point under `screen` fixed.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let anchor = self.screen_to_world(screen);
        self.zoom = new_zoom;
        let moved = self.world_to_screen(anchor);
        self.pan += screen - moved;
    }

    /// Adopt a view received from a peer or a project file. Zoom is clamped;
    /// non-finite values are ignored.
    pub fn set_view(&mut self, zoom: f64, pan: Vec2) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
        if pan.x.is_finite() && pan.y.is_finite() {
            self.pan = pan;
        }
    }

    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Frame `bounds` inside a viewport with some padding.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        if bounds.width() <= 0.0 && bounds.height() <= 0.0 {
            self.reset();
            return;
        }
        let avail_w = (viewport.width - padding * 2.0).max(1.0);
        let avail_h = (viewport.height - padding * 2.0).max(1.0);
        let scale_x = avail_w / bounds.width().max(f64::EPSILON);
        let scale_y = avail_h / bounds.height().max(f64::EPSILON);
        self.zoom = scale_x.min(scale_y).clamp(self.min_zoom, self.max_zoom);

        let c = bounds.center();
        self.pan = Vec2::new(
            viewport.width / 2.0 - c.x * self.zoom,
            viewport.height / 2.0 - c.y * self.zoom,
        );
    }
}
