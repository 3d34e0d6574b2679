//! Win32 window-message decoding
//!
//! Turns the message number and its two parameter words into desktop input
//! events. Mouse coordinates arrive in device pixels and leave in logical
//! units.

use crate::domain::core::Point;
use crate::input::{KeyEvent, MouseButton, PointerEvent};

const WM_KEYDOWN: u32 = 0x0100;
const WM_MOUSEMOVE: u32 = 0x0200;
const WM_LBUTTONDOWN: u32 = 0x0201;
const WM_LBUTTONUP: u32 = 0x0202;
const WM_RBUTTONDOWN: u32 = 0x0204;
const WM_RBUTTONUP: u32 = 0x0205;
const WM_MBUTTONDOWN: u32 = 0x0207;
const WM_MBUTTONUP: u32 = 0x0208;
const WM_MOUSEWHEEL: u32 = 0x020a;
const WM_MOUSELEAVE: u32 = 0x02a3;

/// One decoded input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Key(KeyEvent),
}

/// Decoder for the messages of one map window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageDecoder {
    device_scale: f64,
    /// Screen position of the client area's top-left corner, device pixels
    client_origin: (i32, i32),
}

impl MessageDecoder {
    pub fn new(device_scale: f64) -> Self {
        Self {
            device_scale,
            client_origin: (0, 0),
        }
    }

    /// Records where the client area sits on screen
    ///
    /// Wheel messages carry screen coordinates; all other mouse messages are
    /// client-relative.
    pub fn set_client_origin(&mut self, x: i32, y: i32) {
        self.client_origin = (x, y);
    }

    /// Decodes one message, or None for messages the map does not use
    pub fn decode(&self, msg: u32, wparam: usize, lparam: isize) -> Option<InputEvent> {
        let pointer = |event| Some(InputEvent::Pointer(event));
        match msg {
            WM_MOUSEMOVE => pointer(PointerEvent::Move {
                at: self.client_point(lparam),
            }),
            WM_LBUTTONDOWN | WM_RBUTTONDOWN | WM_MBUTTONDOWN => pointer(PointerEvent::Down {
                button: button_of(msg)?,
                at: self.client_point(lparam),
            }),
            WM_LBUTTONUP | WM_RBUTTONUP | WM_MBUTTONUP => pointer(PointerEvent::Up {
                button: button_of(msg)?,
                at: self.client_point(lparam),
            }),
            WM_MOUSELEAVE => pointer(PointerEvent::Leave),
            WM_MOUSEWHEEL => {
                let (x, y) = point_words(lparam);
                let (ox, oy) = self.client_origin;
                pointer(PointerEvent::Wheel {
                    delta: high_word(wparam as isize) as i32,
                    at: self.to_logical(x - ox, y - oy),
                })
            }
            WM_KEYDOWN => KeyEvent::from_vk_code(wparam as u32).map(InputEvent::Key),
            _ => None,
        }
    }

    fn client_point(&self, lparam: isize) -> Point {
        let (x, y) = point_words(lparam);
        self.to_logical(x, y)
    }

    fn to_logical(&self, x: i32, y: i32) -> Point {
        Point::new(x as f64, y as f64).scaled(1.0 / self.device_scale)
    }
}

fn button_of(msg: u32) -> Option<MouseButton> {
    match msg {
        WM_LBUTTONDOWN | WM_LBUTTONUP => Some(MouseButton::Left),
        WM_RBUTTONDOWN | WM_RBUTTONUP => Some(MouseButton::Right),
        WM_MBUTTONDOWN | WM_MBUTTONUP => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Signed x and y packed in the low and high words (GET_X_LPARAM / GET_Y_LPARAM)
fn point_words(lparam: isize) -> (i32, i32) {
    (low_word(lparam) as i32, high_word(lparam) as i32)
}

fn low_word(value: isize) -> i16 {
    (value & 0xffff) as u16 as i16
}

fn high_word(value: isize) -> i16 {
    ((value >> 16) & 0xffff) as u16 as i16
}
