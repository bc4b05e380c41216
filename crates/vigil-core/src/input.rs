use bitflags::bitflags;

use crate::Vec2;
use crate::tree::NodeId;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        /// Cmd on Mac, Win key on Windows
        const META = 1 << 3;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    Character(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    F(u8), // F1-F12
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    pub is_repeat: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            is_repeat: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,   // Left mouse, touch
    Secondary, // Right mouse
    Tertiary,  // Middle mouse
}

/// A pointer press somewhere in the window.
///
/// `target` is the logical node under the pointer as resolved by the host
/// (see [`crate::Stage::hit`]); `None` means nothing we know about was hit.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub position: Vec2,
    pub button: PointerButton,
    pub target: Option<NodeId>,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn press(target: Option<NodeId>) -> Self {
        Self {
            position: Vec2::default(),
            button: PointerButton::Primary,
            target,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    PointerDown,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::Key(_) => EventKind::KeyDown,
            InputEvent::Pointer(_) => EventKind::PointerDown,
        }
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(ev: KeyEvent) -> Self {
        InputEvent::Key(ev)
    }
}

impl From<PointerEvent> for InputEvent {
    fn from(ev: PointerEvent) -> Self {
        InputEvent::Pointer(ev)
    }
}
