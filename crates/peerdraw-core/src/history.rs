//! Command history for undo/redo.
//!
//! Each finished gesture or editing action becomes one [`Command`] holding
//! enough portable data to run it forwards and backwards. Commands are pushed
//! after they have been applied to the scene.

use crate::scene::{Scene, SceneChange};
use crate::shapes::{Shape, ShapeId, ShapePatch, ShapeRecord};
use std::collections::VecDeque;

/// Default maximum number of undo steps.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// A reversible scene mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Shape inserted at `index`.
    Add { record: ShapeRecord, index: usize },
    /// Shape removed from `index`.
    Remove { record: ShapeRecord, index: usize },
    /// Properties changed; only the differing fields are kept.
    Modify {
        id: ShapeId,
        before: ShapePatch,
        after: ShapePatch,
    },
    /// Shape moved in z-order.
    Reorder { id: ShapeId, from: usize, to: usize },
    /// Several commands undone and redone as one step.
    Batch {
        label: &'static str,
        commands: Vec<Command>,
    },
}

impl Command {
    /// Build a `Modify` from two states of the same shape. `None` when
    /// nothing changed.
    pub fn modify(before: &Shape, after: &Shape) -> Option<Command> {
        match ShapePatch::diff(&before.to_record(), &after.to_record()) {
            Ok(Some((forward, inverse))) => Some(Command::Modify {
                id: after.id(),
                before: inverse,
                after: forward,
            }),
            Ok(None) => None,
            Err(err) => {
                log::warn!("Failed to diff shape {}: {}", after.id(), err);
                None
            }
        }
    }

    /// Wrap several commands. A single command is returned as-is.
    pub fn batch(label: &'static str, mut commands: Vec<Command>) -> Option<Command> {
        match commands.len() {
            0 => None,
            1 => commands.pop(),
            _ => Some(Command::Batch { label, commands }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Remove { .. } => "remove",
            Command::Modify { .. } => "modify",
            Command::Reorder { .. } => "reorder",
            Command::Batch { label, .. } => label,
        }
    }

    /// Run the command forwards.
    pub fn apply(&self, scene: &mut Scene) -> Vec<SceneChange> {
        let mut changes = Vec::new();
        self.apply_into(scene, &mut changes);
        changes
    }

    /// Run the command backwards.
    pub fn revert(&self, scene: &mut Scene) -> Vec<SceneChange> {
        let mut changes = Vec::new();
        self.revert_into(scene, &mut changes);
        changes
    }

    fn apply_into(&self, scene: &mut Scene, changes: &mut Vec<SceneChange>) {
        match self {
            Command::Add { record, index } => insert(scene, record, *index, changes),
            Command::Remove { record, .. } => remove(scene, record.id, changes),
            Command::Modify { id, after, .. } => patch(scene, *id, after, changes),
            Command::Reorder { id, to, .. } => reorder(scene, *id, *to, changes),
            Command::Batch { commands, .. } => {
                for command in commands {
                    command.apply_into(scene, changes);
                }
            }
        }
    }

    fn revert_into(&self, scene: &mut Scene, changes: &mut Vec<SceneChange>) {
        match self {
            Command::Add { record, .. } => remove(scene, record.id, changes),
            Command::Remove { record, index } => insert(scene, record, *index, changes),
            Command::Modify { id, before, .. } => patch(scene, *id, before, changes),
            Command::Reorder { id, from, .. } => reorder(scene, *id, *from, changes),
            Command::Batch { commands, .. } => {
                for command in commands.iter().rev() {
                    command.revert_into(scene, changes);
                }
            }
        }
    }
}

fn insert(scene: &mut Scene, record: &ShapeRecord, index: usize, changes: &mut Vec<SceneChange>) {
    match Shape::from_record(record.clone()) {
        Ok(shape) => {
            let index = scene.insert(index, shape);
            if let Some(shape) = scene.shapes().get(index) {
                changes.push(SceneChange::added(shape, index, scene.len()));
            }
        }
        Err(err) => log::warn!("Cannot restore shape {}: {}", record.id, err),
    }
}

fn remove(scene: &mut Scene, id: ShapeId, changes: &mut Vec<SceneChange>) {
    if scene.remove(id).is_some() {
        changes.push(SceneChange::Removed { id });
    } else {
        log::debug!("Shape {} already gone", id);
    }
}

fn patch(scene: &mut Scene, id: ShapeId, patch: &ShapePatch, changes: &mut Vec<SceneChange>) {
    match scene.apply_patch(id, patch) {
        Ok(()) => changes.push(SceneChange::Updated {
            id,
            patch: patch.clone(),
        }),
        Err(err) => log::warn!("Cannot patch shape {}: {}", id, err),
    }
}

fn reorder(scene: &mut Scene, id: ShapeId, to: usize, changes: &mut Vec<SceneChange>) {
    if scene.move_to(id, to).is_none() {
        log::debug!("Shape {} already gone", id);
        return;
    }
    if let Some(index) = scene.index_of(id) {
        changes.push(SceneChange::Added {
            record: scene.shapes()[index].to_record(),
            index: Some(index),
        });
    }
}

/// Bounded undo/redo stacks.
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<Command>,
    redo_stack: Vec<Command>,
    depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl History {
    pub fn new(depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            depth: depth.max(1),
        }
    }

    /// Record an already-applied command. Clears the redo stack and drops
    /// the oldest entry past the depth limit.
    pub fn push(&mut self, command: Command) {
        log::debug!("History push: {}", command.label());
        self.undo_stack.push_back(command);
        self.redo_stack.clear();
        while self.undo_stack.len() > self.depth {
            self.undo_stack.pop_front();
        }
    }

    /// Revert the latest command. `None` when there is nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> Option<Vec<SceneChange>> {
        let command = self.undo_stack.pop_back()?;
        let changes = command.revert(scene);
        self.redo_stack.push(command);
        Some(changes)
    }

    /// Re-apply the latest undone command.
    pub fn redo(&mut self, scene: &mut Scene) -> Option<Vec<SceneChange>> {
        let command = self.redo_stack.pop()?;
        let changes = command.apply(scene);
        self.undo_stack.push_back(command);
        Some(changes)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}
