//! The scene store: ordered shapes, the current selection and the drawing
//! overlays.
//!
//! Index in the shape list is z-order (later = drawn on top). Every mutating
//! call re-routes connectors and presents a full frame to the attached
//! surface before returning.

use crate::render::{DrawItem, Frame, RemoteCursor, Surface};
use crate::selection::get_handles;
use crate::shapes::{
    Connector, Shape, ShapeError, ShapeId, ShapePatch, ShapeRecord, ShapeResult, rect_contains_rect,
};
use kurbo::{Affine, Point, Rect};
use std::collections::{BTreeMap, HashMap};

/// Which shapes are selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Single(ShapeId),
    Multi(Vec<ShapeId>),
}

impl Selection {
    /// Build from a list of ids, dropping duplicates.
    pub fn from_ids(ids: impl IntoIterator<Item = ShapeId>) -> Self {
        let mut unique: Vec<ShapeId> = Vec::new();
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        match unique.len() {
            0 => Selection::None,
            1 => Selection::Single(unique[0]),
            _ => Selection::Multi(unique),
        }
    }

    pub fn ids(&self) -> Vec<ShapeId> {
        match self {
            Selection::None => Vec::new(),
            Selection::Single(id) => vec![*id],
            Selection::Multi(ids) => ids.clone(),
        }
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        match self {
            Selection::None => false,
            Selection::Single(s) => *s == id,
            Selection::Multi(ids) => ids.contains(&id),
        }
    }

    pub fn single(&self) -> Option<ShapeId> {
        match self {
            Selection::Single(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::None)
    }
}

/// A local mutation, as peers need to hear about it.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneChange {
    /// A shape appeared, or was replaced wholesale. `index` is set when the
    /// shape is not simply on top.
    Added {
        record: ShapeRecord,
        index: Option<usize>,
    },
    Updated {
        id: ShapeId,
        patch: ShapePatch,
    },
    Removed {
        id: ShapeId,
    },
}

impl SceneChange {
    /// Change announcing `shape` at `index`; the index is dropped when the
    /// shape is on top.
    pub fn added(shape: &Shape, index: usize, len: usize) -> Self {
        SceneChange::Added {
            record: shape.to_record(),
            index: (index + 1 < len).then_some(index),
        }
    }
}

/// Move direction for [`Scene::reorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    Front,
    Back,
}

/// Transient drawing state that is rendered but not part of the document.
#[derive(Debug, Clone, Default)]
struct Overlay {
    preview: Option<Shape>,
    marquee: Option<Rect>,
    cursors: BTreeMap<String, Point>,
}

/// Ordered shape collection plus selection.
pub struct Scene {
    shapes: Vec<Shape>,
    selection: Selection,
    overlay: Overlay,
    view: Affine,
    rotate_handle_offset: f64,
    surface: Option<Box<dyn Surface>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("shapes", &self.shapes.len())
            .field("selection", &self.selection)
            .field("has_surface", &self.surface.is_some())
            .finish()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            selection: Selection::None,
            overlay: Overlay::default(),
            view: Affine::IDENTITY,
            rotate_handle_offset: 25.0,
            surface: None,
        }
    }

    /// Attach the renderer and draw the current state once.
    pub fn attach_surface(&mut self, surface: Box<dyn Surface>) {
        self.surface = Some(surface);
        self.redraw();
    }

    pub fn detach_surface(&mut self) -> Option<Box<dyn Surface>> {
        self.surface.take()
    }

    /// Update the world-to-screen transform and the rotate handle offset (world units).
    pub fn set_view(&mut self, view: Affine, rotate_handle_offset: f64) {
        self.view = view;
        self.rotate_handle_offset = rotate_handle_offset;
        self.redraw();
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id() == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.index_of(id).is_some()
    }

    /// Portable records in z-order.
    pub fn records(&self) -> Vec<ShapeRecord> {
        self.shapes.iter().map(Shape::to_record).collect()
    }

    /// Append a shape on top. Returns its index.
    pub fn add(&mut self, shape: Shape) -> usize {
        self.shapes.push(shape);
        self.redraw();
        self.shapes.len() - 1
    }

    /// Insert at `index`, clamped to the end. Returns the actual index.
    pub fn insert(&mut self, index: usize, shape: Shape) -> usize {
        let index = index.min(self.shapes.len());
        self.shapes.insert(index, shape);
        self.redraw();
        index
    }

    /// Remove a shape. Returns its former index and the shape.
    pub fn remove(&mut self, id: ShapeId) -> Option<(usize, Shape)> {
        let index = self.index_of(id)?;
        let shape = self.shapes.remove(index);
        self.prune_selection();
        self.redraw();
        Some((index, shape))
    }

    /// Move a shape to the top or bottom. Returns `(from, to)`.
    pub fn reorder(&mut self, id: ShapeId, order: ZOrder) -> Option<(usize, usize)> {
        let to = match order {
            ZOrder::Front => self.shapes.len().checked_sub(1)?,
            ZOrder::Back => 0,
        };
        let from = self.move_to(id, to)?;
        Some((from, to))
    }

    /// Move a shape to `index` (clamped). Returns its previous index.
    pub fn move_to(&mut self, id: ShapeId, index: usize) -> Option<usize> {
        let from = self.index_of(id)?;
        let shape = self.shapes.remove(from);
        let index = index.min(self.shapes.len());
        self.shapes.insert(index, shape);
        self.redraw();
        Some(from)
    }

    /// Replace the shape with the same id in place. Returns the forward
    /// patch of changed fields, or `None` when the id is unknown or nothing
    /// changed.
    pub fn update(&mut self, shape: Shape) -> Option<ShapePatch> {
        let index = self.index_of(shape.id())?;
        let before = self.shapes[index].to_record();
        let after = shape.to_record();
        self.shapes[index] = shape;
        self.redraw();
        match ShapePatch::diff(&before, &after) {
            Ok(diff) => diff.map(|(forward, _)| forward),
            Err(err) => {
                log::warn!("Failed to diff shape {}: {}", after.id, err);
                None
            }
        }
    }

    /// Shallow-merge a patch into a shape's record. The shape is left
    /// untouched when the patched record is invalid.
    pub fn apply_patch(&mut self, id: ShapeId, patch: &ShapePatch) -> ShapeResult<()> {
        let index = self.index_of(id).ok_or(ShapeError::NotFound(id))?;
        let patched = patch.apply_to_shape(&self.shapes[index])?;
        self.shapes[index] = patched;
        self.redraw();
        Ok(())
    }

    /// Replace the whole document. Clears the selection.
    pub fn replace_all(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        self.selection = Selection::None;
        self.redraw();
    }

    /// Topmost visible shape containing `point`.
    pub fn query_point(&self, point: Point) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .find(|s| s.is_visible() && s.contains_point(point))
            .map(Shape::id)
    }

    /// Visible shapes whose bounds lie entirely inside `region`, in z-order.
    pub fn query_region(&self, region: Rect) -> Vec<ShapeId> {
        let region = region.abs();
        self.shapes
            .iter()
            .filter(|s| s.is_visible())
            .filter(|s| !s.as_connector().is_some_and(Connector::is_dangling))
            .filter(|s| rect_contains_rect(region, s.bounds()))
            .map(Shape::id)
            .collect()
    }

    /// Connectors attached to `id`.
    pub fn connectors_of(&self, id: ShapeId) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|s| s.references(id))
            .map(Shape::id)
            .collect()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_ids(&self) -> Vec<ShapeId> {
        self.selection.ids()
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(id)
    }

    /// Select exactly `ids`. Unknown ids are ignored.
    pub fn select(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        let known: Vec<ShapeId> = ids.into_iter().filter(|id| self.contains(*id)).collect();
        self.selection = Selection::from_ids(known);
        self.redraw();
    }

    /// Add `ids` to the current selection.
    pub fn extend_selection(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        let mut all = self.selection.ids();
        all.extend(ids);
        self.select(all);
    }

    pub fn select_all(&mut self) {
        let ids: Vec<ShapeId> = self.shapes.iter().map(Shape::id).collect();
        self.select(ids);
    }

    pub fn deselect_all(&mut self) {
        if !self.selection.is_empty() {
            self.selection = Selection::None;
            self.redraw();
        }
    }

    /// Union of the selected shapes' bounds, recomputed on every call.
    pub fn selection_bounds(&self) -> Option<Rect> {
        self.selection
            .ids()
            .into_iter()
            .filter_map(|id| self.get(id))
            .map(Shape::bounds)
            .reduce(|acc, b| acc.union(b))
    }

    pub fn set_preview(&mut self, preview: Option<Shape>) {
        self.overlay.preview = preview;
        self.redraw();
    }

    pub fn preview(&self) -> Option<&Shape> {
        self.overlay.preview.as_ref()
    }

    pub fn set_marquee(&mut self, marquee: Option<Rect>) {
        self.overlay.marquee = marquee;
        self.redraw();
    }

    pub fn marquee(&self) -> Option<Rect> {
        self.overlay.marquee
    }

    /// Show or hide a remote peer's pointer.
    pub fn set_remote_cursor(&mut self, peer: &str, position: Option<Point>) {
        match position {
            Some(p) => {
                self.overlay.cursors.insert(peer.to_string(), p);
            }
            None => {
                self.overlay.cursors.remove(peer);
            }
        }
        self.redraw();
    }

    pub fn remote_cursor(&self, peer: &str) -> Option<Point> {
        self.overlay.cursors.get(peer).copied()
    }

    fn prune_selection(&mut self) {
        let kept: Vec<ShapeId> = self
            .selection
            .ids()
            .into_iter()
            .filter(|id| self.shapes.iter().any(|s| s.id() == *id))
            .collect();
        self.selection = Selection::from_ids(kept);
    }

    /// Route connectors and present a full frame.
    pub fn redraw(&mut self) {
        route_connectors(&mut self.shapes);
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let mut items = Vec::with_capacity(self.shapes.len());
        for shape in &self.shapes {
            DrawItem::collect(shape, Affine::IDENTITY, &mut items);
        }
        let mut preview = Vec::new();
        if let Some(shape) = &self.overlay.preview {
            DrawItem::collect(shape, Affine::IDENTITY, &mut preview);
        }
        let handles = self
            .selection
            .single()
            .and_then(|id| self.shapes.iter().find(|s| s.id() == id))
            .map(|s| get_handles(s, self.rotate_handle_offset))
            .unwrap_or_default()
            .into_iter()
            .map(|h| h.position)
            .collect();
        let selection = self
            .selection
            .ids()
            .into_iter()
            .filter_map(|id| self.shapes.iter().find(|s| s.id() == id))
            .map(Shape::bounds)
            .reduce(|acc, b| acc.union(b));
        let frame = Frame {
            view: self.view,
            items,
            selection,
            handles,
            marquee: self.overlay.marquee,
            preview,
            cursors: self
                .overlay
                .cursors
                .iter()
                .map(|(peer, position)| RemoteCursor {
                    peer: peer.clone(),
                    position: *position,
                })
                .collect(),
        };
        surface.present(&frame);
    }
}

/// Recompute every connector's route from the current bounds of its ends.
/// An end nested inside a group resolves to that group's bounds.
fn route_connectors(shapes: &mut [Shape]) {
    let mut lookup: HashMap<ShapeId, Rect> = HashMap::new();
    for shape in shapes.iter() {
        if shape.as_connector().is_some() {
            continue;
        }
        let bounds = shape.bounds();
        lookup.insert(shape.id(), bounds);
        if let Some(group) = shape.as_group() {
            for id in group.all_shape_ids() {
                lookup.entry(id).or_insert(bounds);
            }
        }
    }
    for shape in shapes.iter_mut() {
        match shape {
            Shape::Connector(conn) => {
                let route = match (lookup.get(&conn.from), lookup.get(&conn.to)) {
                    (Some(a), Some(b)) if conn.from != conn.to => {
                        Some(Connector::route_between(*a, *b))
                    }
                    _ => None,
                };
                conn.set_route(route);
            }
            Shape::Group(group) => route_connectors(&mut group.children),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;
    use crate::shapes::{Circle, Group, Rectangle};
    use kurbo::Vec2;
    use uuid::Uuid;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(x, y), w, h))
    }

    #[test]
    fn test_add_remove_and_order() {
        let mut scene = Scene::new();
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 10.0, 10.0);
        let (a_id, b_id) = (a.id(), b.id());
        assert_eq!(scene.add(a), 0);
        assert_eq!(scene.add(b), 1);
        assert_eq!(scene.query_point(Point::new(4.0, 4.0)), Some(b_id));

        assert_eq!(scene.reorder(b_id, ZOrder::Back), Some((1, 0)));
        assert_eq!(scene.query_point(Point::new(4.0, 4.0)), Some(a_id));

        let (index, removed) = scene.remove(a_id).unwrap();
        assert_eq!(index, 1);
        assert_eq!(removed.id(), a_id);
        assert!(scene.remove(a_id).is_none());
    }

    #[test]
    fn test_query_point_skips_hidden() {
        let mut scene = Scene::new();
        let below = rect(0.0, 0.0, 10.0, 10.0);
        let mut above = rect(0.0, 0.0, 10.0, 10.0);
        above.style_mut().visible = false;
        let below_id = below.id();
        scene.add(below);
        scene.add(above);
        assert_eq!(scene.query_point(Point::ZERO), Some(below_id));
        assert_eq!(scene.query_point(Point::new(100.0, 0.0)), None);
    }

    #[test]
    fn test_marquee_selects_fully_contained() {
        let mut scene = Scene::new();
        let a = rect(20.0, 20.0, 20.0, 20.0);
        let b = rect(60.0, 20.0, 20.0, 20.0);
        let c = rect(95.0, 20.0, 20.0, 20.0);
        let (a_id, b_id) = (a.id(), b.id());
        scene.add(a);
        scene.add(b);
        scene.add(c);
        let hits = scene.query_region(Rect::new(100.0, 0.0, 0.0, 50.0));
        assert_eq!(hits, vec![a_id, b_id]);
    }

    #[test]
    fn test_update_returns_patch() {
        let mut scene = Scene::new();
        let shape = rect(0.0, 0.0, 10.0, 10.0);
        let id = shape.id();
        scene.add(shape.clone());
        let mut moved = shape.clone();
        moved.translate(Vec2::new(5.0, 0.0));
        let patch = scene.update(moved).unwrap();
        assert_eq!(patch.0.len(), 1);
        assert!(patch.get("x").is_some());
        assert!(scene.update(scene.get(id).unwrap().clone()).is_none());
        assert!(scene.update(rect(0.0, 0.0, 1.0, 1.0)).is_none());
    }

    #[test]
    fn test_apply_patch_unknown_and_invalid() {
        let mut scene = Scene::new();
        let shape = rect(0.0, 0.0, 10.0, 10.0);
        let id = shape.id();
        scene.add(shape.clone());
        let patch = ShapePatch::new().with("x", 30.0);
        assert!(matches!(
            scene.apply_patch(Uuid::new_v4(), &patch),
            Err(ShapeError::NotFound(_))
        ));
        assert!(scene.apply_patch(id, &ShapePatch::new().with("width", "wide")).is_err());
        assert_eq!(scene.get(id), Some(&shape));
        scene.apply_patch(id, &patch).unwrap();
        assert_eq!(scene.get(id).unwrap().center(), Point::new(30.0, 0.0));
    }

    #[test]
    fn test_selection_bounds_and_prune() {
        let mut scene = Scene::new();
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(100.0, 0.0, 10.0, 10.0);
        let (a_id, b_id) = (a.id(), b.id());
        scene.add(a);
        scene.add(b);
        scene.select([a_id, b_id, Uuid::new_v4()]);
        assert_eq!(scene.selection(), &Selection::Multi(vec![a_id, b_id]));
        let bounds = scene.selection_bounds().unwrap();
        assert_eq!((bounds.x0, bounds.x1), (-5.0, 105.0));

        scene.remove(b_id);
        assert_eq!(scene.selection(), &Selection::Single(a_id));
        scene.deselect_all();
        assert!(scene.selection_bounds().is_none());
    }

    #[test]
    fn test_connectors_follow_shapes() {
        let mut scene = Scene::new();
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(100.0, 0.0, 10.0, 10.0);
        let (a_id, b_id) = (a.id(), b.id());
        scene.add(a.clone());
        scene.add(b);
        let conn = Shape::Connector(Connector::new(a_id, b_id));
        let conn_id = conn.id();
        scene.add(conn);
        let route = scene.get(conn_id).and_then(Shape::as_connector).and_then(Connector::route);
        assert_eq!(route, Some((Point::new(5.0, 0.0), Point::new(95.0, 0.0))));

        let mut moved = a;
        moved.translate(Vec2::new(0.0, 200.0));
        scene.update(moved);
        let route = scene.get(conn_id).and_then(Shape::as_connector).and_then(Connector::route);
        assert_eq!(route, Some((Point::new(0.0, 195.0), Point::new(100.0, 5.0))));

        scene.remove(b_id);
        let conn = scene.get(conn_id).and_then(Shape::as_connector).unwrap();
        assert!(conn.is_dangling());
        assert_eq!(scene.query_point(Point::new(50.0, 100.0)), None);
    }

    #[test]
    fn test_connector_to_grouped_shape_uses_group() {
        let mut scene = Scene::new();
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let inner = rect(100.0, 0.0, 10.0, 10.0);
        let conn = Shape::Connector(Connector::new(a.id(), inner.id()));
        let conn_id = conn.id();
        let group = Shape::Group(Group::from_world(vec![inner, rect(100.0, 50.0, 10.0, 10.0)]));
        scene.add(a);
        scene.add(group);
        scene.add(conn);
        let conn = scene.get(conn_id).and_then(Shape::as_connector).unwrap();
        assert!(!conn.is_dangling());
    }

    #[test]
    fn test_mutations_present_frames() {
        let surface = RecordingSurface::new();
        let mut scene = Scene::new();
        scene.attach_surface(Box::new(surface.clone()));
        assert_eq!(surface.frame_count(), 1);

        let circle = Shape::Circle(Circle::new(Point::ZERO, 5.0));
        let id = circle.id();
        scene.add(circle);
        scene.select([id]);
        scene.set_marquee(Some(Rect::new(0.0, 0.0, 1.0, 1.0)));
        scene.set_remote_cursor("peer-b", Some(Point::new(3.0, 4.0)));
        assert_eq!(surface.frame_count(), 5);

        let frame = surface.last_frame().unwrap();
        assert!(frame.item(id).is_some());
        assert_eq!(frame.handles.len(), 9);
        assert!(frame.marquee.is_some());
        assert_eq!(frame.cursors.len(), 1);
    }
}
