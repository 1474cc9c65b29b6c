//! Project document: the whole scene plus the view, as saved to disk.

use crate::camera::{Camera, PanOffset};
use crate::scene::Scene;
use crate::shapes::{Shape, ShapeError, ShapeId, ShapeRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Current document format version.
pub const PROJECT_VERSION: u32 = 1;

/// Project document errors.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Unsupported project version {0} (newest known is {PROJECT_VERSION})")]
    UnsupportedVersion(u32),
    #[error("Invalid shape at index {index}: {source}")]
    InvalidShape {
        index: usize,
        #[source]
        source: ShapeError,
    },
    #[error("Duplicate shape id: {0}")]
    DuplicateId(ShapeId),
}

/// Result type for project operations.
pub type ProjectResult<T> = Result<T, ProjectError>;

fn default_version() -> u32 {
    PROJECT_VERSION
}

fn default_zoom() -> f64 {
    1.0
}

/// Serialized project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default)]
    pub pan: PanOffset,
    /// Shapes in z-order, bottom first.
    #[serde(default)]
    pub shapes: Vec<ShapeRecord>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            version: PROJECT_VERSION,
            zoom: 1.0,
            pan: PanOffset::default(),
            shapes: Vec::new(),
        }
    }
}

impl Project {
    /// Snapshot of a scene and its view.
    pub fn capture(scene: &Scene, camera: &Camera) -> Self {
        Self {
            version: PROJECT_VERSION,
            zoom: camera.zoom,
            pan: camera.pan.into(),
            shapes: scene.records(),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> ProjectResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a document. Versions newer than [`PROJECT_VERSION`] are
    /// rejected before the shapes are looked at.
    pub fn from_json(json: &str) -> ProjectResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        if let Some(version) = value.get("version").and_then(Value::as_u64) {
            if version > u64::from(PROJECT_VERSION) {
                return Err(ProjectError::UnsupportedVersion(
                    u32::try_from(version).unwrap_or(u32::MAX),
                ));
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Convert every record into a shape. Fails on the first invalid record
    /// or on a repeated id, so a bad document never half-loads.
    pub fn to_shapes(&self) -> ProjectResult<Vec<Shape>> {
        let mut seen = HashSet::new();
        self.shapes
            .iter()
            .enumerate()
            .map(|(index, record)| {
                if !seen.insert(record.id) {
                    return Err(ProjectError::DuplicateId(record.id));
                }
                Shape::from_record(record.clone())
                    .map_err(|source| ProjectError::InvalidShape { index, source })
            })
            .collect()
    }
}
