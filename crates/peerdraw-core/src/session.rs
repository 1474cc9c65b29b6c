//! The editing session: single owner of the scene, its history, the view
//! and the peer connections.
//!
//! Every local mutation goes through here so it can be recorded for undo
//! and broadcast to peers. Remote messages come in through
//! [`Session::receive`] and are applied without either.

use crate::camera::Camera;
use crate::collaboration::{PeerSession, RemoteEffect, apply_remote};
use crate::config::EditorConfig;
use crate::history::{Command, History};
use crate::input::{InputState, Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::interaction::{Interaction, InteractionContext, Outcome};
use crate::project::{Project, ProjectResult};
use crate::render::Surface;
use crate::scene::{Scene, SceneChange, ZOrder};
use crate::shapes::{Group, Image, Shape, ShapeId};
use crate::snap::SnapMode;
use crate::storage::{Storage, StorageError, StorageResult};
use crate::sync::{
    ConnectionRole, PeerChannel, PeerId, PeerMessage, SyncResult, SyncSnapshot, join_url,
    parse_join_url,
};
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Size, Vec2};
use peniko::Color;
use std::cmp::Reverse;
use std::collections::HashSet;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Zoom step per wheel notch.
const WHEEL_ZOOM_IN: f64 = 1.1;
const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Padding used by [`Session::zoom_to_fit`], in screen pixels.
const FIT_PADDING: f64 = 50.0;

/// A local editing session.
pub struct Session {
    config: EditorConfig,
    scene: Scene,
    history: History,
    camera: Camera,
    interaction: Interaction,
    input: InputState,
    peers: PeerSession,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Session {
    /// Session with a freshly generated peer identity.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_peer_id(config, PeerId::generate())
    }

    pub fn with_peer_id(config: EditorConfig, local_id: PeerId) -> Self {
        let config = config.sanitized();
        let mut session = Self {
            scene: Scene::new(),
            history: History::new(config.history_depth),
            camera: Camera::from_config(&config),
            interaction: Interaction::new(&config),
            input: InputState::new(),
            peers: PeerSession::new(local_id),
            config,
        };
        session.refresh_view();
        session
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn peers(&self) -> &PeerSession {
        &self.peers
    }

    pub fn local_id(&self) -> &PeerId {
        self.peers.local_id()
    }

    /// Attach the renderer. It receives a frame right away.
    pub fn attach_surface(&mut self, surface: Box<dyn Surface>) {
        self.scene.attach_surface(surface);
    }

    // --- Tools ---

    pub fn tool(&self) -> ToolKind {
        self.interaction.tools.current_tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.interaction.set_tool(&mut self.scene, tool);
    }

    /// Style and shape parameters for new shapes.
    pub fn tools_mut(&mut self) -> &mut ToolManager {
        &mut self.interaction.tools
    }

    pub fn set_snap_mode(&mut self, mode: SnapMode) {
        self.interaction.snap_mode = mode;
    }

    // --- Input ---

    /// Feed a pointer event (screen coordinates).
    pub fn handle_pointer(&mut self, event: PointerEvent, modifiers: Modifiers) {
        self.input.modifiers = modifiers;
        self.input.handle_pointer_event(&event);
        let space_held = self.input.space_held();
        let mut ctx = InteractionContext {
            scene: &mut self.scene,
            camera: &mut self.camera,
            config: &self.config,
        };
        let outcome = match event {
            PointerEvent::Down { position, button } => {
                self.interaction
                    .pointer_down(&mut ctx, position, button, modifiers, space_held)
            }
            PointerEvent::Move { position } => {
                let outcome = self.interaction.pointer_move(&mut ctx, position, modifiers);
                let world = self.camera.screen_to_world(position);
                self.peers.send_cursor(world);
                outcome
            }
            PointerEvent::Up { position, button } => {
                if button == MouseButton::Right {
                    return;
                }
                self.interaction.pointer_up(&mut ctx, position, modifiers)
            }
            PointerEvent::Scroll { position, delta } => {
                if delta.y != 0.0 {
                    let factor = if delta.y > 0.0 { WHEEL_ZOOM_IN } else { WHEEL_ZOOM_OUT };
                    self.zoom_at(position, factor);
                }
                return;
            }
        };
        self.finish(outcome);
    }

    /// Feed a keyboard event.
    pub fn handle_key(&mut self, event: KeyEvent, modifiers: Modifiers) {
        self.input.modifiers = modifiers;
        self.input.handle_key_event(&event);
        let KeyEvent::Pressed(key) = event else {
            return;
        };
        match key {
            Key::Escape => {
                if !self.interaction.cancel(&mut self.scene) {
                    self.scene.deselect_all();
                }
            }
            Key::Delete | Key::Backspace => {
                self.delete_selection();
            }
            Key::Char(c) if modifiers.command() => match c {
                'z' if modifiers.shift => {
                    self.redo();
                }
                'z' => {
                    self.undo();
                }
                'y' => {
                    self.redo();
                }
                'g' if modifiers.shift => {
                    self.ungroup_selection();
                }
                'g' => {
                    self.group_selection();
                }
                'a' => self.scene.select_all(),
                _ => {}
            },
            Key::Char(']') => self.reorder_selection(ZOrder::Front),
            Key::Char('[') => self.reorder_selection(ZOrder::Back),
            Key::Char(c) => {
                if let Some(tool) = ToolKind::from_shortcut(c) {
                    self.set_tool(tool);
                }
            }
            Key::Space | Key::Enter => {}
        }
    }

    // --- View ---

    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        self.camera.zoom_at(screen, factor);
        self.refresh_view();
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.camera.pan_by(delta);
        self.refresh_view();
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
        self.refresh_view();
    }

    /// Frame every shape inside the viewport.
    pub fn zoom_to_fit(&mut self, viewport: Size) {
        let bounds = self
            .scene
            .shapes()
            .iter()
            .map(Shape::bounds)
            .reduce(|a, b| a.union(b));
        match bounds {
            Some(bounds) => self.camera.fit_to_bounds(bounds, viewport, FIT_PADDING),
            None => self.camera.reset(),
        }
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        InteractionContext {
            scene: &mut self.scene,
            camera: &mut self.camera,
            config: &self.config,
        }
        .refresh_view();
    }

    // --- History ---

    /// Undo the last command. Ignored while a gesture is in progress.
    pub fn undo(&mut self) -> bool {
        if !self.interaction.is_idle() {
            log::debug!("Ignoring undo during a gesture");
            return false;
        }
        match self.history.undo(&mut self.scene) {
            Some(changes) => {
                self.peers.broadcast(&changes);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone command. Ignored while a gesture is in progress.
    pub fn redo(&mut self) -> bool {
        if !self.interaction.is_idle() {
            log::debug!("Ignoring redo during a gesture");
            return false;
        }
        match self.history.redo(&mut self.scene) {
            Some(changes) => {
                self.peers.broadcast(&changes);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Broadcast the changes and record the command.
    fn finish(&mut self, outcome: Outcome) {
        if !outcome.changes.is_empty() {
            self.peers.broadcast(&outcome.changes);
        }
        if let Some(command) = outcome.command {
            self.history.push(command);
        }
    }

    fn execute(&mut self, command: Command) {
        let changes = command.apply(&mut self.scene);
        self.finish(Outcome {
            changes,
            command: Some(command),
        });
    }

    // --- Editing ---

    /// Add a shape on top and select it.
    pub fn insert_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.execute(Command::Add {
            record: shape.to_record(),
            index: self.scene.len(),
        });
        self.scene.select([id]);
        id
    }

    /// Place an image centered at `center` (world coordinates), scaled down
    /// to the configured maximum size.
    pub fn insert_image(&mut self, center: Point, pixel_size: (f64, f64), src: String) -> ShapeId {
        let mut image = Image::fitted(center, pixel_size, self.config.max_image_size, src);
        image.style = self.interaction.tools.current_style.clone();
        self.insert_shape(Shape::Image(image))
    }

    /// Delete the selection together with every connector attached to it.
    /// Returns the number of shapes removed.
    pub fn delete_selection(&mut self) -> usize {
        let mut doomed: HashSet<ShapeId> = HashSet::new();
        for id in self.scene.selected_ids() {
            let Some(shape) = self.scene.get(id) else {
                continue;
            };
            doomed.insert(id);
            let nested = shape.as_group().map(Group::all_shape_ids).unwrap_or_default();
            for target in std::iter::once(id).chain(nested) {
                doomed.extend(self.scene.connectors_of(target));
            }
        }

        let mut victims: Vec<(usize, &Shape)> = doomed
            .iter()
            .filter_map(|id| Some((self.scene.index_of(*id)?, self.scene.get(*id)?)))
            .collect();
        victims.sort_by_key(|(index, _)| Reverse(*index));
        let count = victims.len();
        let commands = victims
            .into_iter()
            .map(|(index, shape)| Command::Remove {
                record: shape.to_record(),
                index,
            })
            .collect();
        if let Some(command) = Command::batch("delete", commands) {
            self.execute(command);
        }
        count
    }

    /// Group the selection. The group takes the z-position of the topmost
    /// member. Needs at least two shapes.
    pub fn group_selection(&mut self) -> Option<ShapeId> {
        let mut members: Vec<(usize, Shape)> = self
            .scene
            .selected_ids()
            .into_iter()
            .filter_map(|id| Some((self.scene.index_of(id)?, self.scene.get(id)?.clone())))
            .collect();
        if members.len() < 2 {
            return None;
        }
        members.sort_by_key(|(index, _)| *index);
        let top = members.last().map(|(index, _)| *index)?;
        let insert_at = top + 1 - members.len();

        let mut commands: Vec<Command> = members
            .iter()
            .rev()
            .map(|(index, shape)| Command::Remove {
                record: shape.to_record(),
                index: *index,
            })
            .collect();
        let group = Shape::Group(Group::from_world(
            members.into_iter().map(|(_, shape)| shape).collect(),
        ));
        let group_id = group.id();
        commands.push(Command::Add {
            record: group.to_record(),
            index: insert_at,
        });
        self.execute(Command::batch("group", commands)?);
        self.scene.select([group_id]);
        Some(group_id)
    }

    /// Dissolve every selected group, putting the children back in world
    /// coordinates at the group's z-position. Returns the children's ids.
    pub fn ungroup_selection(&mut self) -> Vec<ShapeId> {
        let mut groups: Vec<(usize, Group)> = self
            .scene
            .selected_ids()
            .into_iter()
            .filter_map(|id| match self.scene.get(id) {
                Some(Shape::Group(group)) => Some((self.scene.index_of(id)?, group.clone())),
                _ => None,
            })
            .collect();
        groups.sort_by_key(|(index, _)| Reverse(*index));

        let mut commands = Vec::new();
        let mut children_ids = Vec::new();
        for (index, group) in groups {
            commands.push(Command::Remove {
                record: Shape::Group(group.clone()).to_record(),
                index,
            });
            for (offset, child) in group.into_world().into_iter().enumerate() {
                children_ids.push(child.id());
                commands.push(Command::Add {
                    record: child.to_record(),
                    index: index + offset,
                });
            }
        }
        let Some(command) = Command::batch("ungroup", commands) else {
            return Vec::new();
        };
        self.execute(command);
        self.scene.select(children_ids.iter().copied());
        children_ids
    }

    /// Move the selection to the top or the bottom, keeping its relative order.
    pub fn reorder_selection(&mut self, order: ZOrder) {
        let mut ids: Vec<(usize, ShapeId)> = self
            .scene
            .selected_ids()
            .into_iter()
            .filter_map(|id| Some((self.scene.index_of(id)?, id)))
            .collect();
        match order {
            ZOrder::Front => ids.sort_by_key(|(index, _)| *index),
            ZOrder::Back => ids.sort_by_key(|(index, _)| Reverse(*index)),
        }

        let mut changes = Vec::new();
        let mut commands = Vec::new();
        for (_, id) in ids {
            let Some(from) = self.scene.index_of(id) else {
                continue;
            };
            let to = match order {
                ZOrder::Front => self.scene.len() - 1,
                ZOrder::Back => 0,
            };
            if from == to {
                continue;
            }
            let command = Command::Reorder { id, from, to };
            changes.extend(command.apply(&mut self.scene));
            commands.push(command);
        }
        self.finish(Outcome {
            changes,
            command: Command::batch("reorder", commands),
        });
    }

    /// Edit every selected shape with `edit`, as one undo step.
    /// Returns whether anything changed.
    pub fn modify_selection(&mut self, label: &'static str, mut edit: impl FnMut(&mut Shape)) -> bool {
        let commands = self
            .scene
            .selected_ids()
            .into_iter()
            .filter_map(|id| {
                let before = self.scene.get(id)?;
                let mut after = before.clone();
                edit(&mut after);
                Command::modify(before, &after)
            })
            .collect();
        match Command::batch(label, commands) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    pub fn set_stroke_color(&mut self, color: Color) -> bool {
        self.modify_selection("style", |shape| shape.style_mut().set_stroke(color))
    }

    pub fn set_fill_color(&mut self, color: Option<Color>) -> bool {
        self.modify_selection("style", |shape| shape.style_mut().set_fill(color))
    }

    pub fn set_stroke_width(&mut self, width: f64) -> bool {
        let width = width.max(0.0);
        self.modify_selection("style", |shape| shape.style_mut().stroke_width = width)
    }

    pub fn set_opacity(&mut self, opacity: f64) -> bool {
        let opacity = opacity.clamp(0.0, 1.0);
        self.modify_selection("style", |shape| shape.style_mut().opacity = opacity)
    }

    pub fn set_visible(&mut self, visible: bool) -> bool {
        self.modify_selection("visibility", |shape| shape.style_mut().visible = visible)
    }

    pub fn set_rotation(&mut self, degrees: f64) -> bool {
        self.modify_selection("rotate", |shape| shape.set_rotation(degrees))
    }

    /// Replace the content of the selected text shapes.
    pub fn set_text(&mut self, content: &str) -> bool {
        self.modify_selection("text", |shape| {
            if let Shape::Text(text) = shape {
                text.content = content.to_string();
            }
        })
    }

    // --- Projects ---

    pub fn export_project(&self) -> Project {
        Project::capture(&self.scene, &self.camera)
    }

    pub fn export_json(&self) -> ProjectResult<String> {
        self.export_project().to_json()
    }

    /// Replace the scene with a project. The project is validated first: on
    /// error the scene is left untouched. History is cleared and peers are
    /// told to drop the old shapes and add the new ones.
    pub fn import_project(&mut self, project: &Project) -> ProjectResult<()> {
        let shapes = project.to_shapes().inspect_err(|err| {
            log::warn!("Import failed: {}", err);
        })?;
        self.interaction.cancel(&mut self.scene);

        let mut changes: Vec<SceneChange> = self
            .scene
            .shapes()
            .iter()
            .map(|shape| SceneChange::Removed { id: shape.id() })
            .collect();
        self.scene.replace_all(shapes);
        changes.extend(self.scene.shapes().iter().map(|shape| SceneChange::Added {
            record: shape.to_record(),
            index: None,
        }));

        self.camera.set_view(project.zoom, project.pan.into());
        self.refresh_view();
        self.history.clear();
        log::info!("Imported project with {} shapes", self.scene.len());
        self.peers.broadcast(&changes);
        Ok(())
    }

    pub fn import_json(&mut self, json: &str) -> ProjectResult<()> {
        let project = Project::from_json(json).inspect_err(|err| {
            log::warn!("Import failed: {}", err);
        })?;
        self.import_project(&project)
    }

    pub async fn save_to<S: Storage + ?Sized>(&self, storage: &S, name: &str) -> StorageResult<()> {
        storage.save(name, &self.export_project()).await
    }

    pub async fn load_from<S: Storage + ?Sized>(&mut self, storage: &S, name: &str) -> StorageResult<()> {
        let project = storage.load(name).await?;
        self.import_project(&project)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    // --- Peers ---

    /// State handed to a peer that connects to us.
    pub fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            shapes: self.scene.records(),
            zoom: self.camera.zoom,
            pan: self.camera.pan.into(),
        }
    }

    /// Share link for this session.
    pub fn join_link(&self, base: &str) -> SyncResult<String> {
        join_url(base, self.peers.local_id())
    }

    /// If the page URL asks to join a peer, schedule the automatic connect.
    /// Returns the peer to be dialed.
    pub fn schedule_join(&mut self, page_url: &str, now: Instant) -> SyncResult<Option<PeerId>> {
        let target = parse_join_url(page_url)?;
        if let Some(target) = &target {
            let delay = self.config.auto_connect_delay();
            self.peers.schedule_auto_connect(target.clone(), now, delay);
        }
        Ok(target)
    }

    /// The peer the host should dial now, if the join delay has passed.
    pub fn poll_auto_connect(&mut self, now: Instant) -> Option<PeerId> {
        self.peers.poll_auto_connect(now)
    }

    pub fn connection_opened(&mut self, peer: PeerId, channel: Box<dyn PeerChannel>, role: ConnectionRole) {
        let snapshot = self.snapshot();
        self.peers.connection_opened(peer, channel, role, &snapshot);
    }

    pub fn connection_closed(&mut self, peer: &PeerId) {
        if self.peers.connection_closed(peer) {
            self.scene.set_remote_cursor(peer.as_str(), None);
        }
    }

    pub fn connection_failed(&mut self, peer: Option<&PeerId>, reason: &str) {
        self.peers.connection_failed(peer, reason);
        if let Some(peer) = peer {
            self.scene.set_remote_cursor(peer.as_str(), None);
        }
    }

    /// Pending user-facing notices ("working solo").
    pub fn take_notices(&mut self) -> Vec<String> {
        self.peers.take_notices()
    }

    /// Apply a message from a peer.
    pub fn receive(&mut self, message: PeerMessage) -> RemoteEffect {
        let effect = apply_remote(&mut self.scene, &mut self.camera, message);
        if effect == RemoteEffect::Adopted {
            self.history.clear();
            self.refresh_view();
        }
        effect
    }

    /// Parse and apply a raw message. Malformed messages are logged and
    /// returned as errors; the scene is untouched.
    pub fn receive_json(&mut self, json: &str) -> SyncResult<RemoteEffect> {
        let message = PeerMessage::from_json(json).inspect_err(|err| {
            log::warn!("Dropping malformed peer message: {}", err);
        })?;
        Ok(self.receive(message))
    }
}
