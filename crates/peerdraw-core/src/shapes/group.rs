//! Group shape for combining multiple shapes.
//!
//! Children are stored by value in group-local coordinates: a child at
//! local position `p` sits at `origin + p` in world space, then the whole
//! group is rotated about its bounds center. A fresh group has its origin at
//! zero, so the children keep their world coordinates bit for bit and moving
//! the group only moves `origin`.

use super::{Shape, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use uuid::Uuid;

/// A group of shapes that can be manipulated as a single unit.
/// Groups can contain other groups, enabling nested hierarchies.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub(crate) id: ShapeId,
    /// World position of the local coordinate origin.
    pub origin: Point,
    /// Child shapes in local coordinates, in z-order.
    pub children: Vec<Shape>,
    pub rotation: f64,
    /// Style properties (not used for drawing children).
    pub style: ShapeStyle,
}

impl Group {
    /// Build a group from shapes in world coordinates.
    pub fn from_world(shapes: Vec<Shape>) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin: Point::ZERO,
            children: shapes,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Dissolve this group and return its children in world coordinates.
    pub fn into_world(self) -> Vec<Shape> {
        let pivot = self.bounds().center();
        let offset = self.origin.to_vec2();
        let rotation = self.rotation;
        self.children
            .into_iter()
            .map(|mut child| {
                if offset != Vec2::ZERO {
                    child.translate(offset);
                }
                child.rotate_about(pivot, rotation);
                child
            })
            .collect()
    }

    /// Get the children of this group.
    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    /// Get all shape IDs in this group (including nested groups).
    pub fn all_shape_ids(&self) -> Vec<ShapeId> {
        let mut ids = vec![self.id];
        for child in &self.children {
            match child {
                Shape::Group(group) => ids.extend(group.all_shape_ids()),
                _ => ids.push(child.id()),
            }
        }
        ids
    }

    /// Find a shape by ID within this group (including nested groups).
    pub fn find_shape(&self, id: ShapeId) -> Option<&Shape> {
        for child in &self.children {
            if child.id() == id {
                return Some(child);
            }
            if let Shape::Group(group) = child {
                if let Some(found) = group.find_shape(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// World-space bounds of a descendant, ignoring the group's rotation.
    pub fn child_world_bounds(&self, id: ShapeId) -> Option<Rect> {
        let offset = self.origin.to_vec2();
        for child in &self.children {
            if child.id() == id {
                return Some(child.bounds() + offset);
            }
            if let Shape::Group(group) = child {
                if let Some(found) = group.child_world_bounds(id) {
                    return Some(found + offset);
                }
            }
        }
        None
    }
}

fn union_bounds(shapes: &[Shape]) -> Option<Rect> {
    shapes.iter().map(Shape::bounds).reduce(|acc, b| acc.union(b))
}

impl ShapeTrait for Group {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        match union_bounds(&self.children) {
            Some(rect) => rect + self.origin.to_vec2(),
            None => Rect::from_points(self.origin, self.origin),
        }
    }

    fn contains_local(&self, point: Point) -> bool {
        let local = point - self.origin.to_vec2();
        self.children
            .iter()
            .any(|child| child.is_visible() && child.contains_point(local))
    }

    fn local_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for child in &self.children {
            path.extend(child.to_path());
        }
        path.apply_affine(Affine::translate(self.origin.to_vec2()));
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.origin += delta;
    }
}
