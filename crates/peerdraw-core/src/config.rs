//! Editor configuration.
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a usable configuration.

use crate::shapes::{MAX_REGULAR_SIDES, MAX_STAR_POINTS, MIN_POLYGON_VERTICES, MIN_STAR_POINTS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept.
    pub history_depth: usize,
    /// Drawn shapes smaller than this in both dimensions are discarded.
    pub min_shape_size: f64,
    /// Screen-pixel radius for grabbing resize and rotate handles.
    pub handle_hit_tolerance: f64,
    /// Distance of the rotate handle above the selection box, in screen pixels.
    pub rotate_handle_offset: f64,
    /// Grid spacing in world units.
    pub grid_size: f64,
    /// Shape snapping radius in screen pixels.
    pub snap_threshold: f64,
    /// Delay between identity allocation and the automatic join connect.
    pub auto_connect_delay_ms: u64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Side count used by the polygon tool.
    pub polygon_sides: usize,
    /// Point count used by the star tool.
    pub star_points: u32,
    /// Longest side of an inserted image, in world units.
    pub max_image_size: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: 50,
            min_shape_size: 5.0,
            handle_hit_tolerance: 8.0,
            rotate_handle_offset: 25.0,
            grid_size: 20.0,
            snap_threshold: 10.0,
            auto_connect_delay_ms: 1000,
            min_zoom: 0.1,
            max_zoom: 10.0,
            polygon_sides: 6,
            star_points: 5,
            max_image_size: 400.0,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Pull out-of-range values back to something the editor can run with.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.history_depth = self.history_depth.max(1);
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            self.min_zoom = defaults.min_zoom;
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            self.max_zoom = defaults.max_zoom.max(self.min_zoom);
        }
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            self.grid_size = defaults.grid_size;
        }
        self.polygon_sides = self
            .polygon_sides
            .clamp(MIN_POLYGON_VERTICES, MAX_REGULAR_SIDES);
        self.star_points = self.star_points.clamp(MIN_STAR_POINTS, MAX_STAR_POINTS);
        self
    }

    pub fn auto_connect_delay(&self) -> Duration {
        Duration::from_millis(self.auto_connect_delay_ms)
    }
}
