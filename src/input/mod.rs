pub mod keyboard;
pub mod mouse;

pub use keyboard::{KeyBindings, KeyEvent, PanDirection};
pub use mouse::{MouseButton, MouseGestures, PointerEvent};
