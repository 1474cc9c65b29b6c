//! Input event types and held-key tracking.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Delete,
    Backspace,
    Space,
    Enter,
    /// A printable character, lowercase for letters.
    Char(char),
}

/// Pointer event type for unified mouse/touch handling. Positions are in
/// screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
    Scroll { position: Point, delta: Vec2 },
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

/// Tracks pointer position, held buttons and held keys between events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Last pointer position in screen coordinates.
    pub pointer_position: Point,
    pub modifiers: Modifiers,
    pressed_buttons: HashSet<MouseButton>,
    pressed_keys: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = *position;
                self.pressed_buttons.insert(*button);
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = *position;
                self.pressed_buttons.remove(button);
            }
            PointerEvent::Move { position } | PointerEvent::Scroll { position, .. } => {
                self.pointer_position = *position;
            }
        }
    }

    /// Record a key event.
    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        match event {
            KeyEvent::Pressed(key) => {
                self.pressed_keys.insert(key.clone());
            }
            KeyEvent::Released(key) => {
                self.pressed_keys.remove(key);
            }
        }
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    pub fn is_key_pressed(&self, key: &Key) -> bool {
        self.pressed_keys.contains(key)
    }

    /// Space held turns any pointer drag into a pan.
    pub fn space_held(&self) -> bool {
        self.is_key_pressed(&Key::Space)
    }
}
