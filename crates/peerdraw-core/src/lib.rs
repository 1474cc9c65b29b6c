//! PeerDraw Core Library
//!
//! Scene graph, interaction, undo history and peer synchronization for a
//! collaborative drawing surface. Rendering and the peer transport are
//! supplied by the host through [`render::Surface`] and [`sync::PeerChannel`].

pub mod camera;
pub mod collaboration;
pub mod config;
pub mod history;
pub mod input;
pub mod interaction;
pub mod project;
pub mod render;
pub mod scene;
pub mod selection;
pub mod session;
pub mod shapes;
pub mod snap;
pub mod storage;
pub mod sync;
pub mod tools;

pub use camera::{Camera, PanOffset};
pub use collaboration::{PeerSession, RemoteEffect, apply_remote};
pub use config::EditorConfig;
pub use history::{Command, History};
pub use input::{InputState, Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use interaction::{Interaction, InteractionState};
pub use project::{Project, ProjectError};
pub use render::{Frame, Surface};
pub use scene::{Scene, SceneChange, Selection, ZOrder};
pub use session::Session;
pub use shapes::{Shape, ShapeId, ShapePatch, ShapeRecord};
pub use snap::{SnapMode, snap_point, snap_to_grid};
pub use sync::{PeerChannel, PeerId, PeerMessage};
pub use tools::{ToolKind, ToolManager};
