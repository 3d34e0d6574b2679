//! Platform adapters
//!
//! Window-message decoding is plain arithmetic on the message words and
//! builds everywhere; DPI discovery talks to Win32 and only exists on
//! Windows.

#[cfg(windows)]
pub mod dpi;
pub mod messages;

pub use messages::{InputEvent, MessageDecoder};

/// Device pixels per logical unit for the primary display
///
/// Always 1.0 off Windows.
pub fn system_scale_factor() -> f64 {
    #[cfg(windows)]
    {
        dpi::primary_scale_factor()
    }
    #[cfg(not(windows))]
    {
        1.0
    }
}
