//! Manipulation event stream
//!
//! Platform recognizers (touch pan/pinch/twist, mouse drag, wheel) are
//! adapted into one stream of tagged events. The core only needs the
//! gesture kind, the phase, the cumulative value reported by the recognizer
//! and the current contact point.

use crate::domain::core::Point;

/// The three independent manipulation accumulators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Pan,
    Zoom,
    Rotate,
}

impl GestureKind {
    pub const ALL: [GestureKind; 3] = [GestureKind::Pan, GestureKind::Zoom, GestureKind::Rotate];
}

/// Cumulative value reported by a recognizer since its gesture began
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureDelta {
    /// Content translation in logical units
    Pan(Point),
    /// Scale factor, 1.0 = unchanged
    Zoom(f64),
    /// Rotation in radians, 0.0 = unchanged
    Rotate(f64),
}

impl GestureDelta {
    pub fn kind(&self) -> GestureKind {
        match self {
            GestureDelta::Pan(_) => GestureKind::Pan,
            GestureDelta::Zoom(_) => GestureKind::Zoom,
            GestureDelta::Rotate(_) => GestureKind::Rotate,
        }
    }
}

/// One event of the manipulation stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManipulationEvent {
    /// A recognizer reported a new cumulative value at `location`
    Changed { delta: GestureDelta, location: Point },
    /// A recognizer completed normally
    Ended(GestureKind),
    /// A recognizer was cancelled by the platform
    Cancelled(GestureKind),
    /// A discrete tap or click at `location`
    Tap(Point),
}

impl ManipulationEvent {
    pub fn pan(translation: Point, location: Point) -> Self {
        ManipulationEvent::Changed {
            delta: GestureDelta::Pan(translation),
            location,
        }
    }

    pub fn zoom(scale: f64, location: Point) -> Self {
        ManipulationEvent::Changed {
            delta: GestureDelta::Zoom(scale),
            location,
        }
    }

    pub fn rotate(radians: f64, location: Point) -> Self {
        ManipulationEvent::Changed {
            delta: GestureDelta::Rotate(radians),
            location,
        }
    }
}
