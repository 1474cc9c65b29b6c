//! Renderer interface.
//!
//! Painting happens outside this crate. After every scene mutation the scene
//! builds a [`Frame`] (world-space outlines in z-order plus overlays) and
//! hands it to the attached [`Surface`].

use crate::shapes::{Shape, ShapeId};
use kurbo::{Affine, BezPath, Point, Rect};
use peniko::Color;
use std::cell::RefCell;
use std::rc::Rc;

/// Selection highlight color.
pub const SELECTION_COLOR: Color = Color::from_rgba8(59, 130, 246, 255);

/// Extra data for shapes whose look is more than an outline.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawDetail {
    None,
    Text {
        content: String,
        font_size: f64,
        font_family: String,
        center: Point,
        rotation: f64,
    },
    Image {
        src: String,
        bounds: Rect,
        rotation: f64,
    },
}

/// One visible shape, ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub id: ShapeId,
    /// Variant tag, as in portable records.
    pub kind: &'static str,
    /// Outline in world space with rotation applied.
    pub path: BezPath,
    pub stroke: Color,
    pub stroke_width: f64,
    pub fill: Option<Color>,
    pub detail: DrawDetail,
}

impl DrawItem {
    /// Flatten a shape into draw items. Groups expand into their children,
    /// placed in world space; `parent` is the transform of enclosing groups.
    pub fn collect(shape: &Shape, parent: Affine, out: &mut Vec<DrawItem>) {
        if !shape.is_visible() {
            return;
        }
        if let Shape::Group(group) = shape {
            let pivot = shape.center();
            let local = parent
                * Affine::rotate_about(group.rotation.to_radians(), pivot)
                * Affine::translate(group.origin.to_vec2());
            for child in &group.children {
                Self::collect(child, local, out);
            }
            return;
        }
        if let Shape::Connector(conn) = shape {
            if conn.is_dangling() {
                return;
            }
        }
        let style = shape.style();
        let mut path = shape.to_path();
        path.apply_affine(parent);
        let detail = match shape {
            Shape::Text(text) => DrawDetail::Text {
                content: text.content.clone(),
                font_size: text.font_size,
                font_family: text.font_family.clone(),
                center: parent * text.center,
                rotation: text.rotation,
            },
            Shape::Image(image) => DrawDetail::Image {
                src: image.src.clone(),
                bounds: parent.transform_rect_bbox(image.as_rect()),
                rotation: image.rotation,
            },
            _ => DrawDetail::None,
        };
        out.push(DrawItem {
            id: shape.id(),
            kind: shape.type_name(),
            path,
            stroke: style.stroke_with_opacity(),
            stroke_width: style.stroke_width,
            fill: style.fill_with_opacity(),
            detail,
        });
    }
}

/// A remote peer's pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCursor {
    pub peer: String,
    pub position: Point,
}

/// Everything a renderer needs for one full redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// World-to-screen transform.
    pub view: Affine,
    /// Visible shapes, bottom first.
    pub items: Vec<DrawItem>,
    /// Union bounds of the selection.
    pub selection: Option<Rect>,
    /// Handle positions of a single selection.
    pub handles: Vec<Point>,
    pub marquee: Option<Rect>,
    /// Shape being drawn, not yet part of the scene.
    pub preview: Vec<DrawItem>,
    pub cursors: Vec<RemoteCursor>,
}

impl Frame {
    pub fn item(&self, id: ShapeId) -> Option<&DrawItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// The external renderer.
pub trait Surface {
    /// Paint a full frame. Called synchronously after each scene mutation.
    fn present(&mut self, frame: &Frame);
}

/// Surface that keeps every frame it receives. Useful for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    frames: Rc<RefCell<Vec<Frame>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.frames.borrow().last().cloned()
    }
}

impl Surface for RecordingSurface {
    fn present(&mut self, frame: &Frame) {
        self.frames.borrow_mut().push(frame.clone());
    }
}
