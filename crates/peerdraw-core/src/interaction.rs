//! Pointer interaction state machine.
//!
//! Turns pointer and keyboard input into scene mutations. Live feedback
//! (moved, resized or rotated shapes) is written to the scene on every move
//! and reported as [`SceneChange`]s for broadcasting; releasing the pointer
//! produces exactly one [`Command`] for the whole gesture.

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::history::Command;
use crate::input::{Modifiers, MouseButton};
use crate::scene::{Scene, SceneChange};
use crate::selection::{HandleKind, hit_test_handles, resize_shape, rotate_shape};
use crate::shapes::{Shape, ShapeId};
use crate::snap::{SnapMode, collect_targets, snap_point};
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Rect};

/// Where the pointer gesture currently is.
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// A drawing tool is dragging out a new shape.
    Drawing {
        start: Point,
        current: Point,
        /// Pointer trail for the path tool.
        points: Vec<Point>,
        /// Shape under the press, for the connector tool.
        source: Option<ShapeId>,
    },
    /// Selected shapes follow the pointer.
    Dragging { start: Point, originals: Vec<Shape> },
    Resizing {
        handle: HandleKind,
        start: Point,
        original: Shape,
    },
    Rotating { start: Point, original: Shape },
    MarqueeSelecting {
        start: Point,
        current: Point,
        /// Shift was held: add to the selection instead of replacing it.
        additive: bool,
    },
    /// Last pointer position in screen space.
    Panning { last: Point },
}

/// What an input event did to the scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Mutations to broadcast, in order.
    pub changes: Vec<SceneChange>,
    /// Finished gesture to push on the history.
    pub command: Option<Command>,
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.command.is_none()
    }
}

/// Everything an event handler may read or touch.
pub struct InteractionContext<'a> {
    pub scene: &'a mut Scene,
    pub camera: &'a mut Camera,
    pub config: &'a EditorConfig,
}

impl InteractionContext<'_> {
    /// Push the camera transform and the zoom-scaled handle offset to the scene.
    pub fn refresh_view(&mut self) {
        let offset = self.camera.screen_to_world_len(self.config.rotate_handle_offset);
        self.scene.set_view(self.camera.transform(), offset);
    }

    fn snap(&self, mode: SnapMode, point: Point, exclude: &[ShapeId]) -> Point {
        if mode == SnapMode::None {
            return point;
        }
        let targets = if mode.snaps_to_shapes() {
            collect_targets(self.scene.shapes(), exclude)
        } else {
            Vec::new()
        };
        let threshold = self.camera.screen_to_world_len(self.config.snap_threshold);
        snap_point(point, mode, self.config.grid_size, &targets, threshold).point
    }
}

/// The interaction state machine plus the active tool.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    state: InteractionState,
    pub tools: ToolManager,
    pub snap_mode: SnapMode,
}

impl Interaction {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            state: InteractionState::Idle,
            tools: ToolManager::from_config(config),
            snap_mode: SnapMode::None,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, InteractionState::Idle)
    }

    /// Switch tools. An unfinished drawing is dropped.
    pub fn set_tool(&mut self, scene: &mut Scene, tool: ToolKind) {
        if matches!(self.state, InteractionState::Drawing { .. }) {
            self.state = InteractionState::Idle;
            scene.set_preview(None);
        }
        self.tools.set_tool(tool);
    }

    pub fn pointer_down(
        &mut self,
        ctx: &mut InteractionContext<'_>,
        screen: Point,
        button: MouseButton,
        modifiers: Modifiers,
        space_held: bool,
    ) -> Outcome {
        if !self.is_idle() {
            return Outcome::default();
        }
        let tool = self.tools.current_tool;
        if button == MouseButton::Middle || space_held || tool == ToolKind::Pan {
            self.state = InteractionState::Panning { last: screen };
            return Outcome::default();
        }
        if button != MouseButton::Left {
            return Outcome::default();
        }

        let world = ctx.camera.screen_to_world(screen);
        match tool {
            ToolKind::Select => self.begin_select(ctx, world, modifiers),
            ToolKind::Pan => {}
            ToolKind::Connector => {
                let source = ctx
                    .scene
                    .query_point(world)
                    .filter(|id| ctx.scene.get(*id).is_some_and(|s| s.as_connector().is_none()));
                self.state = InteractionState::Drawing {
                    start: world,
                    current: world,
                    points: Vec::new(),
                    source,
                };
            }
            _ => {
                let start = ctx.snap(self.snap_mode, world, &[]);
                self.state = InteractionState::Drawing {
                    start,
                    current: start,
                    points: vec![start],
                    source: None,
                };
            }
        }
        Outcome::default()
    }

    fn begin_select(&mut self, ctx: &mut InteractionContext<'_>, world: Point, modifiers: Modifiers) {
        if let Some(shape) = ctx.scene.selection().single().and_then(|id| ctx.scene.get(id)) {
            let tolerance = ctx.camera.screen_to_world_len(ctx.config.handle_hit_tolerance);
            let offset = ctx.camera.screen_to_world_len(ctx.config.rotate_handle_offset);
            if let Some(handle) = hit_test_handles(shape, world, tolerance, offset) {
                let original = shape.clone();
                self.state = if handle.is_resize() {
                    InteractionState::Resizing {
                        handle,
                        start: world,
                        original,
                    }
                } else {
                    InteractionState::Rotating {
                        start: world,
                        original,
                    }
                };
                return;
            }
        }

        match ctx.scene.query_point(world) {
            Some(id) => {
                if modifiers.shift {
                    ctx.scene.extend_selection([id]);
                } else if !ctx.scene.is_selected(id) {
                    ctx.scene.select([id]);
                }
                let originals = ctx
                    .scene
                    .selected_ids()
                    .into_iter()
                    .filter_map(|id| ctx.scene.get(id).cloned())
                    .collect();
                self.state = InteractionState::Dragging {
                    start: world,
                    originals,
                };
            }
            None => {
                if !modifiers.shift {
                    ctx.scene.deselect_all();
                }
                self.state = InteractionState::MarqueeSelecting {
                    start: world,
                    current: world,
                    additive: modifiers.shift,
                };
            }
        }
    }

    pub fn pointer_move(
        &mut self,
        ctx: &mut InteractionContext<'_>,
        screen: Point,
        modifiers: Modifiers,
    ) -> Outcome {
        let world = ctx.camera.screen_to_world(screen);
        let snap_mode = self.snap_mode;
        let mut outcome = Outcome::default();
        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                ctx.camera.pan_by(delta);
                ctx.refresh_view();
            }
            InteractionState::Drawing {
                start,
                current,
                points,
                source,
            } => {
                let preview = if self.tools.current_tool == ToolKind::Connector {
                    *current = world;
                    source.map(|_| self.tools.connector_preview(*start, world))
                } else {
                    *current = ctx.snap(snap_mode, world, &[]);
                    if points.last() != Some(&world) {
                        points.push(world);
                    }
                    self.tools.create_shape(*start, *current, points, modifiers.shift)
                };
                ctx.scene.set_preview(preview);
            }
            InteractionState::Dragging { start, originals } => {
                let mut delta = world - *start;
                let bounds = originals.iter().map(Shape::bounds).reduce(|a, b| a.union(b));
                if let Some(bounds) = bounds.filter(|_| snap_mode != SnapMode::None) {
                    let exclude: Vec<ShapeId> = originals.iter().map(Shape::id).collect();
                    let anchor = bounds.origin() + delta;
                    delta = ctx.snap(snap_mode, anchor, &exclude) - bounds.origin();
                }
                for original in originals.iter() {
                    let mut shape = original.clone();
                    shape.translate(delta);
                    push_update(ctx.scene, shape, &mut outcome);
                }
            }
            InteractionState::Resizing {
                handle,
                start,
                original,
            } => {
                let shape = resize_shape(original, *handle, *start, world, modifiers.shift);
                push_update(ctx.scene, shape, &mut outcome);
            }
            InteractionState::Rotating { start, original } => {
                let shape = rotate_shape(original, *start, world, modifiers.shift);
                push_update(ctx.scene, shape, &mut outcome);
            }
            InteractionState::MarqueeSelecting { start, current, .. } => {
                *current = world;
                ctx.scene.set_marquee(Some(Rect::from_points(*start, world)));
            }
        }
        outcome
    }

    /// Finish the gesture at `screen`. The release position counts as a
    /// final move before the gesture is committed.
    pub fn pointer_up(
        &mut self,
        ctx: &mut InteractionContext<'_>,
        screen: Point,
        modifiers: Modifiers,
    ) -> Outcome {
        let mut outcome = self.pointer_move(ctx, screen, modifiers);
        let world = ctx.camera.screen_to_world(screen);
        match std::mem::take(&mut self.state) {
            InteractionState::Idle | InteractionState::Panning { .. } => {}
            InteractionState::Drawing {
                start,
                current,
                points,
                source,
            } => {
                ctx.scene.set_preview(None);
                let shape = if self.tools.current_tool == ToolKind::Connector {
                    let target = ctx
                        .scene
                        .query_point(world)
                        .filter(|id| ctx.scene.get(*id).is_some_and(|s| s.as_connector().is_none()));
                    match (source, target) {
                        (Some(from), Some(to)) if from != to => {
                            Some(self.tools.create_connector(from, to))
                        }
                        _ => None,
                    }
                } else {
                    self.tools.create_shape(start, current, &points, modifiers.shift)
                };
                if let Some(shape) = shape {
                    commit_new_shape(ctx, shape, &mut outcome);
                }
            }
            InteractionState::Dragging { originals, .. } => {
                let commands = originals
                    .iter()
                    .filter_map(|before| {
                        let after = ctx.scene.get(before.id())?;
                        Command::modify(before, after)
                    })
                    .collect();
                outcome.command = Command::batch("move", commands);
            }
            InteractionState::Resizing { original, .. }
            | InteractionState::Rotating { original, .. } => {
                outcome.command = ctx
                    .scene
                    .get(original.id())
                    .and_then(|after| Command::modify(&original, after));
            }
            InteractionState::MarqueeSelecting {
                start, additive, ..
            } => {
                ctx.scene.set_marquee(None);
                let hits = ctx.scene.query_region(Rect::from_points(start, world));
                if additive {
                    ctx.scene.extend_selection(hits);
                } else {
                    ctx.scene.select(hits);
                }
            }
        }
        outcome
    }

    /// Escape: drop an unfinished drawing or marquee. Drags, resizes and
    /// rotations cannot be cancelled. Returns whether anything was cancelled.
    pub fn cancel(&mut self, scene: &mut Scene) -> bool {
        match self.state {
            InteractionState::Drawing { .. } => {
                self.state = InteractionState::Idle;
                scene.set_preview(None);
                true
            }
            InteractionState::MarqueeSelecting { .. } => {
                self.state = InteractionState::Idle;
                scene.set_marquee(None);
                true
            }
            _ => false,
        }
    }
}

fn push_update(scene: &mut Scene, shape: Shape, outcome: &mut Outcome) {
    let id = shape.id();
    if let Some(patch) = scene.update(shape) {
        outcome.changes.push(SceneChange::Updated { id, patch });
    }
}

/// Add a freshly drawn shape, unless it is too small to have been meant.
fn commit_new_shape(ctx: &mut InteractionContext<'_>, shape: Shape, outcome: &mut Outcome) {
    let min = ctx.config.min_shape_size;
    let bounds = shape.bounds();
    if shape.as_connector().is_none() && bounds.width() < min && bounds.height() < min {
        log::debug!(
            "Discarding {} smaller than {}x{}",
            shape.type_name(),
            min,
            min
        );
        return;
    }
    let id = shape.id();
    let record = shape.to_record();
    let index = ctx.scene.add(shape);
    ctx.scene.select([id]);
    outcome.changes.push(SceneChange::Added {
        record: record.clone(),
        index: None,
    });
    outcome.command = Some(Command::Add { record, index });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Rectangle;
    use kurbo::Vec2;

    struct Harness {
        scene: Scene,
        camera: Camera,
        config: EditorConfig,
        interaction: Interaction,
    }

    impl Harness {
        fn new() -> Self {
            let config = EditorConfig::default();
            Self {
                scene: Scene::new(),
                camera: Camera::from_config(&config),
                interaction: Interaction::new(&config),
                config,
            }
        }

        fn down(&mut self, x: f64, y: f64, modifiers: Modifiers) -> Outcome {
            let mut ctx = InteractionContext {
                scene: &mut self.scene,
                camera: &mut self.camera,
                config: &self.config,
            };
            self.interaction
                .pointer_down(&mut ctx, Point::new(x, y), MouseButton::Left, modifiers, false)
        }

        fn move_to(&mut self, x: f64, y: f64, modifiers: Modifiers) -> Outcome {
            let mut ctx = InteractionContext {
                scene: &mut self.scene,
                camera: &mut self.camera,
                config: &self.config,
            };
            self.interaction.pointer_move(&mut ctx, Point::new(x, y), modifiers)
        }

        fn up(&mut self, x: f64, y: f64, modifiers: Modifiers) -> Outcome {
            let mut ctx = InteractionContext {
                scene: &mut self.scene,
                camera: &mut self.camera,
                config: &self.config,
            };
            self.interaction.pointer_up(&mut ctx, Point::new(x, y), modifiers)
        }

        fn drag(&mut self, from: (f64, f64), to: (f64, f64)) -> Outcome {
            self.down(from.0, from.1, Modifiers::NONE);
            self.move_to((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0, Modifiers::NONE);
            self.up(to.0, to.1, Modifiers::NONE)
        }

        fn add_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> ShapeId {
            let shape = Shape::Rectangle(Rectangle::new(Point::new(x, y), w, h));
            let id = shape.id();
            self.scene.add(shape);
            id
        }

        fn tool(&mut self, tool: ToolKind) {
            self.interaction.set_tool(&mut self.scene, tool);
        }
    }

    #[test]
    fn test_draw_rectangle() {
        let mut h = Harness::new();
        h.tool(ToolKind::Rectangle);
        let outcome = h.drag((0.0, 0.0), (100.0, 50.0));
        assert_eq!(h.scene.len(), 1);
        assert!(h.scene.preview().is_none());
        assert!(matches!(outcome.command, Some(Command::Add { index: 0, .. })));
        assert!(matches!(outcome.changes[..], [SceneChange::Added { index: None, .. }]));
        assert_eq!(h.scene.shapes()[0].bounds(), Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(h.scene.selected_ids(), vec![h.scene.shapes()[0].id()]);
    }

    #[test]
    fn test_undersized_shape_discarded() {
        let mut h = Harness::new();
        h.tool(ToolKind::Rectangle);
        let outcome = h.drag((0.0, 0.0), (3.0, 4.0));
        assert!(outcome.is_empty());
        assert!(h.scene.is_empty());

        // Thin but long is kept.
        h.tool(ToolKind::Line);
        h.drag((0.0, 0.0), (100.0, 0.0));
        assert_eq!(h.scene.len(), 1);
    }

    #[test]
    fn test_escape_cancels_drawing_and_marquee() {
        let mut h = Harness::new();
        h.tool(ToolKind::Circle);
        h.down(0.0, 0.0, Modifiers::NONE);
        h.move_to(40.0, 0.0, Modifiers::NONE);
        assert!(h.scene.preview().is_some());
        assert!(h.interaction.cancel(&mut h.scene));
        assert!(h.scene.preview().is_none());
        assert!(h.interaction.is_idle());
        assert!(h.up(40.0, 0.0, Modifiers::NONE).is_empty());
        assert!(h.scene.is_empty());

        h.tool(ToolKind::Select);
        h.down(0.0, 0.0, Modifiers::NONE);
        h.move_to(10.0, 10.0, Modifiers::NONE);
        assert!(h.scene.marquee().is_some());
        assert!(h.interaction.cancel(&mut h.scene));
        assert!(h.scene.marquee().is_none());
    }

    #[test]
    fn test_drag_cannot_be_cancelled() {
        let mut h = Harness::new();
        h.add_rect(0.0, 0.0, 20.0, 20.0);
        h.down(0.0, 0.0, Modifiers::NONE);
        assert!(!h.interaction.cancel(&mut h.scene));
        assert!(matches!(h.interaction.state(), InteractionState::Dragging { .. }));
    }

    #[test]
    fn test_drag_is_one_command_without_drift() {
        let mut h = Harness::new();
        let id = h.add_rect(0.0, 0.0, 20.0, 20.0);
        h.down(0.0, 0.0, Modifiers::NONE);
        let mut live = 0;
        for step in 1..=10 {
            live += h.move_to(step as f64, step as f64 * 0.5, Modifiers::NONE).changes.len();
        }
        let outcome = h.up(10.0, 5.0, Modifiers::NONE);
        assert_eq!(live, 10);
        assert_eq!(h.scene.get(id).unwrap().center(), Point::new(10.0, 5.0));
        assert!(matches!(outcome.command, Some(Command::Modify { .. })));
    }

    #[test]
    fn test_click_without_move_selects_only() {
        let mut h = Harness::new();
        let id = h.add_rect(0.0, 0.0, 20.0, 20.0);
        h.down(0.0, 0.0, Modifiers::NONE);
        let outcome = h.up(0.0, 0.0, Modifiers::NONE);
        assert!(outcome.is_empty());
        assert!(h.scene.is_selected(id));
    }

    #[test]
    fn test_multi_drag_is_batch() {
        let mut h = Harness::new();
        let a = h.add_rect(0.0, 0.0, 20.0, 20.0);
        let b = h.add_rect(100.0, 0.0, 20.0, 20.0);
        h.scene.select([a, b]);
        let outcome = h.drag((0.0, 0.0), (0.0, 30.0));
        match outcome.command {
            Some(Command::Batch { commands, .. }) => assert_eq!(commands.len(), 2),
            other => panic!("expected batch, got {other:?}"),
        }
        assert_eq!(h.scene.get(b).unwrap().center(), Point::new(100.0, 30.0));
    }

    #[test]
    fn test_se_resize_and_undo() {
        let mut h = Harness::new();
        let id = h.add_rect(0.0, 0.0, 100.0, 100.0);
        h.down(0.0, 0.0, Modifiers::NONE);
        h.up(0.0, 0.0, Modifiers::NONE);

        h.down(50.0, 50.0, Modifiers::NONE);
        assert!(matches!(h.interaction.state(), InteractionState::Resizing { .. }));
        h.move_to(60.0, 60.0, Modifiers::NONE);
        let outcome = h.up(70.0, 70.0, Modifiers::NONE);

        let Some(Shape::Rectangle(rect)) = h.scene.get(id) else {
            panic!("rectangle missing");
        };
        assert!((rect.width - 120.0).abs() < 1e-9);
        assert!((rect.height - 120.0).abs() < 1e-9);
        assert!((rect.center - Point::new(10.0, 10.0)).hypot() < 1e-9);

        outcome.command.unwrap().revert(&mut h.scene);
        let Some(Shape::Rectangle(rect)) = h.scene.get(id) else {
            panic!("rectangle missing");
        };
        assert_eq!((rect.width, rect.height, rect.center), (100.0, 100.0, Point::ZERO));
    }

    #[test]
    fn test_rotate_handle_with_snap() {
        let mut h = Harness::new();
        let id = h.add_rect(0.0, 0.0, 100.0, 100.0);
        h.scene.select([id]);
        // Rotate handle sits 25 above the top edge.
        h.down(0.0, -75.0, Modifiers::NONE);
        assert!(matches!(h.interaction.state(), InteractionState::Rotating { .. }));
        let outcome = h.up(77.0, -73.0, Modifiers::SHIFT);
        assert!((h.scene.get(id).unwrap().rotation() - 45.0).abs() < 1e-9);
        assert!(outcome.command.is_some());
    }

    #[test]
    fn test_marquee_selection() {
        let mut h = Harness::new();
        let a = h.add_rect(20.0, 20.0, 20.0, 20.0);
        let b = h.add_rect(60.0, 20.0, 20.0, 20.0);
        let c = h.add_rect(95.0, 20.0, 20.0, 20.0);
        h.down(0.0, 0.0, Modifiers::NONE);
        h.move_to(50.0, 25.0, Modifiers::NONE);
        h.up(100.0, 50.0, Modifiers::NONE);
        assert_eq!(h.scene.selected_ids(), vec![a, b]);
        assert!(h.scene.marquee().is_none());

        h.down(80.0, -10.0, Modifiers::SHIFT);
        h.up(120.0, 40.0, Modifiers::SHIFT);
        assert_eq!(h.scene.selected_ids(), vec![a, b, c]);
    }

    #[test]
    fn test_click_empty_deselects() {
        let mut h = Harness::new();
        let a = h.add_rect(0.0, 0.0, 10.0, 10.0);
        h.scene.select([a]);
        h.down(500.0, 500.0, Modifiers::NONE);
        h.up(500.0, 500.0, Modifiers::NONE);
        assert!(h.scene.selection().is_empty());
    }

    #[test]
    fn test_pan_with_middle_button() {
        let mut h = Harness::new();
        h.add_rect(0.0, 0.0, 10.0, 10.0);
        let mut ctx = InteractionContext {
            scene: &mut h.scene,
            camera: &mut h.camera,
            config: &h.config,
        };
        h.interaction.pointer_down(
            &mut ctx,
            Point::new(10.0, 10.0),
            MouseButton::Middle,
            Modifiers::NONE,
            false,
        );
        h.interaction.pointer_move(&mut ctx, Point::new(40.0, 30.0), Modifiers::NONE);
        let outcome = h.interaction.pointer_up(&mut ctx, Point::new(40.0, 30.0), Modifiers::NONE);
        assert!(outcome.is_empty());
        assert_eq!(h.camera.pan, Vec2::new(30.0, 20.0));
    }

    #[test]
    fn test_connector_tool_links_shapes() {
        let mut h = Harness::new();
        let a = h.add_rect(0.0, 0.0, 20.0, 20.0);
        let b = h.add_rect(100.0, 0.0, 20.0, 20.0);
        h.tool(ToolKind::Connector);
        h.down(0.0, 0.0, Modifiers::NONE);
        h.move_to(50.0, 0.0, Modifiers::NONE);
        assert!(h.scene.preview().is_some());
        let outcome = h.up(100.0, 0.0, Modifiers::NONE);
        assert!(outcome.command.is_some());
        let conn = h.scene.shapes()[2].as_connector().unwrap();
        assert_eq!((conn.from, conn.to), (a, b));
        assert!(!conn.is_dangling());

        // Released on empty canvas: nothing.
        h.down(0.0, 0.0, Modifiers::NONE);
        assert!(h.up(300.0, 300.0, Modifiers::NONE).is_empty());
        assert_eq!(h.scene.len(), 3);
        assert!(h.scene.shapes().iter().filter_map(Shape::as_connector).all(|c| !c.is_dangling()));
    }

    #[test]
    fn test_text_click_to_place() {
        let mut h = Harness::new();
        h.tool(ToolKind::Text);
        h.down(30.0, 40.0, Modifiers::NONE);
        h.up(30.0, 40.0, Modifiers::NONE);
        let Some(Shape::Text(text)) = h.scene.shapes().first() else {
            panic!("text missing");
        };
        assert_eq!(text.content, "Text");
        assert_eq!(text.center, Point::new(30.0, 40.0));
    }

    #[test]
    fn test_grid_snap_while_drawing() {
        let mut h = Harness::new();
        h.interaction.snap_mode = SnapMode::Grid;
        h.tool(ToolKind::Rectangle);
        h.drag((3.0, -4.0), (98.0, 41.0));
        assert_eq!(h.scene.shapes()[0].bounds(), Rect::new(0.0, 0.0, 100.0, 40.0));
    }

    #[test]
    fn test_zoomed_camera_maps_pointer() {
        let mut h = Harness::new();
        h.camera.set_view(2.0, Vec2::new(100.0, 0.0));
        h.tool(ToolKind::Rectangle);
        h.drag((100.0, 0.0), (300.0, 100.0));
        assert_eq!(h.scene.shapes()[0].bounds(), Rect::new(0.0, 0.0, 100.0, 50.0));
    }
}
