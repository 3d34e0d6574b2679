//! Keyboard commands for the desktop shell
//!
//! Keys move the engine view directly in fixed steps; there is no preview
//! for them. Escape abandons a mouse drag in progress and `c` forgets the
//! current route.

use crate::app::commit::ViewCommand;
use crate::domain::core::DevicePoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Keys the shell reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    ZoomIn,
    ZoomOut,
    RotateRight,
    RotateLeft,
    Pan(PanDirection),
    Cancel,
    /// Forget the route endpoints and the current instruction
    ClearRoute,
}

impl KeyEvent {
    /// Converts a typed character
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'i' => Some(KeyEvent::ZoomIn),
            'o' => Some(KeyEvent::ZoomOut),
            'r' => Some(KeyEvent::RotateRight),
            'l' => Some(KeyEvent::RotateLeft),
            'c' => Some(KeyEvent::ClearRoute),
            _ => None,
        }
    }

    /// Converts a Windows virtual key code
    pub fn from_vk_code(vk_code: u32) -> Option<Self> {
        match vk_code {
            0x49 => Some(KeyEvent::ZoomIn),      // I
            0x4f => Some(KeyEvent::ZoomOut),     // O
            0x52 => Some(KeyEvent::RotateRight), // R
            0x4c => Some(KeyEvent::RotateLeft),  // L
            0x43 => Some(KeyEvent::ClearRoute),  // C

            0x25 => Some(KeyEvent::Pan(PanDirection::Left)),  // VK_LEFT
            0x27 => Some(KeyEvent::Pan(PanDirection::Right)), // VK_RIGHT
            0x26 => Some(KeyEvent::Pan(PanDirection::Up)),    // VK_UP
            0x28 => Some(KeyEvent::Pan(PanDirection::Down)),  // VK_DOWN

            0x1b => Some(KeyEvent::Cancel), // VK_ESCAPE

            _ => None,
        }
    }
}

/// Step sizes of the keyboard commands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyBindings {
    /// Device pixels per arrow key
    pub pan_step: i32,
    /// Zoom-in factor; zoom-out uses the reciprocal
    pub zoom_factor: f64,
    /// Degrees per rotate key
    pub rotate_step: f64,
}

impl KeyBindings {
    /// The engine command for `key`, or None for keys that are not view moves
    pub fn command_for(&self, key: KeyEvent) -> Option<ViewCommand> {
        let step = self.pan_step;
        match key {
            KeyEvent::ZoomIn => Some(ViewCommand::Zoom(self.zoom_factor)),
            KeyEvent::ZoomOut => Some(ViewCommand::Zoom(1.0 / self.zoom_factor)),
            KeyEvent::RotateRight => Some(ViewCommand::Rotate(self.rotate_step)),
            KeyEvent::RotateLeft => Some(ViewCommand::Rotate(-self.rotate_step)),
            KeyEvent::Pan(PanDirection::Left) => Some(ViewCommand::Pan(DevicePoint::new(-step, 0))),
            KeyEvent::Pan(PanDirection::Right) => Some(ViewCommand::Pan(DevicePoint::new(step, 0))),
            KeyEvent::Pan(PanDirection::Up) => Some(ViewCommand::Pan(DevicePoint::new(0, -step))),
            KeyEvent::Pan(PanDirection::Down) => Some(ViewCommand::Pan(DevicePoint::new(0, step))),
            KeyEvent::Cancel | KeyEvent::ClearRoute => None,
        }
    }
}
