//! Mouse input for the desktop shell
//!
//! Translates pointer events into the shared manipulation stream:
//! - left drag pans (previewed, committed on release or when the pointer
//!   leaves the window)
//! - right click requests a route point
//! - the wheel zooms about the cursor as a one-shot zoom gesture

use crate::domain::core::Point;
use crate::domain::gesture::{GestureKind, ManipulationEvent};

/// Wheel units per notch
pub const WHEEL_DELTA: i32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer events in logical view units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { button: MouseButton, at: Point },
    Move { at: Point },
    Up { button: MouseButton, at: Point },
    Leave,
    Wheel { delta: i32, at: Point },
}

/// Stateful pointer-to-manipulation translator
#[derive(Debug, Clone)]
pub struct MouseGestures {
    /// Press point of the drag in progress
    anchor: Option<Point>,
    /// Whether the drag has left the slop radius
    dragging: bool,
    tap_slop: f64,
    wheel_zoom_factor: f64,
}

impl MouseGestures {
    pub fn new(tap_slop: f64, wheel_zoom_factor: f64) -> Self {
        Self {
            anchor: None,
            dragging: false,
            tap_slop,
            wheel_zoom_factor,
        }
    }

    /// True while the left button is held
    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// Zoom factor for a wheel rotation of `delta` units
    ///
    /// A partial notch counts as one notch in its direction.
    pub fn wheel_factor(&self, delta: i32) -> f64 {
        let mut notches = delta / WHEEL_DELTA;
        if notches == 0 {
            notches = if delta >= 0 { 1 } else { -1 };
        }
        self.wheel_zoom_factor.powi(notches)
    }

    /// Translates one pointer event
    pub fn translate(&mut self, event: PointerEvent) -> Vec<ManipulationEvent> {
        match event {
            PointerEvent::Down {
                button: MouseButton::Left,
                at,
            } => {
                self.anchor = Some(at);
                self.dragging = false;
                Vec::new()
            }

            PointerEvent::Move { at } => match self.anchor {
                Some(anchor) => {
                    let offset = at - anchor;
                    if !self.dragging && offset.length() <= self.tap_slop {
                        return Vec::new();
                    }
                    self.dragging = true;
                    vec![ManipulationEvent::pan(offset, at)]
                }
                None => Vec::new(),
            },

            PointerEvent::Up {
                button: MouseButton::Left,
                at,
            } => match self.anchor.take() {
                Some(anchor) => {
                    let offset = at - anchor;
                    let moved = std::mem::replace(&mut self.dragging, false);
                    if !moved && offset.length() <= self.tap_slop {
                        // a click: snap any preview back without touching the engine
                        vec![ManipulationEvent::Cancelled(GestureKind::Pan)]
                    } else {
                        vec![
                            ManipulationEvent::pan(offset, at),
                            ManipulationEvent::Ended(GestureKind::Pan),
                        ]
                    }
                }
                None => Vec::new(),
            },

            PointerEvent::Up {
                button: MouseButton::Right,
                at,
            } => vec![ManipulationEvent::Tap(at)],

            PointerEvent::Leave => {
                self.dragging = false;
                match self.anchor.take() {
                    Some(_) => vec![ManipulationEvent::Ended(GestureKind::Pan)],
                    None => Vec::new(),
                }
            }

            PointerEvent::Wheel { delta, at } => {
                if delta == 0 {
                    return Vec::new();
                }
                vec![
                    ManipulationEvent::zoom(self.wheel_factor(delta), at),
                    ManipulationEvent::Ended(GestureKind::Zoom),
                ]
            }

            PointerEvent::Down { .. } | PointerEvent::Up { .. } => Vec::new(),
        }
    }

    /// Abandons the drag in progress
    pub fn cancel_drag(&mut self) -> Vec<ManipulationEvent> {
        self.dragging = false;
        match self.anchor.take() {
            Some(_) => vec![ManipulationEvent::Cancelled(GestureKind::Pan)],
            None => Vec::new(),
        }
    }
}
