//! Accumulated interactive transform
//!
//! Holds the uncommitted pan/zoom/rotate produced by live gestures together
//! with the last bitmap the engine rendered. The preview draws that bitmap
//! through this transform until the gesture is committed or cancelled.

use tiny_skia::Pixmap;

use crate::domain::core::Point;
use crate::domain::gesture::GestureDelta;

/// Largest offset or contact coordinate accepted, in logical units
pub const MAX_COORDINATE: f64 = 1.0e6;

fn within_view_range(point: Point) -> bool {
    point.x.abs() <= MAX_COORDINATE && point.y.abs() <= MAX_COORDINATE
}

/// Uncommitted interactive transform plus the bitmap it applies to
///
/// `scale` is always strictly positive. While `scale == 1` and
/// `rotation == 0` only the translation is applied.
#[derive(Debug, Clone)]
pub struct GestureTransformState {
    offset: Point,
    scale: f64,
    rotation: f64,
    pivot: Point,
    bitmap: Option<Pixmap>,
}

impl Default for GestureTransformState {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureTransformState {
    /// Creates an identity transform with no bitmap yet
    pub fn new() -> Self {
        Self {
            offset: Point::ZERO,
            scale: 1.0,
            rotation: 0.0,
            pivot: Point::ZERO,
            bitmap: None,
        }
    }

    /// Translation of the content in logical units
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Scale factor about the pivot
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Rotation about the pivot, in radians
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Last reported contact point, in logical units
    pub fn pivot(&self) -> Point {
        self.pivot
    }

    /// The bitmap currently in effect, if the engine has rendered one
    pub fn bitmap(&self) -> Option<&Pixmap> {
        self.bitmap.as_ref()
    }

    /// Replaces the bitmap in effect with a freshly rendered one
    pub fn set_bitmap(&mut self, bitmap: Pixmap) {
        self.bitmap = Some(bitmap);
    }

    /// Starts a new gesture: resets the transform, keeps the bitmap in effect
    pub fn begin_gesture(&mut self) {
        self.reset();
    }

    /// Sets one accumulator from a recognizer's cumulative value
    ///
    /// Only the accumulator named by `delta` changes; the pivot always moves
    /// to `location`. A non-positive or non-finite scale, a non-finite
    /// rotation, or an offset or location beyond [`MAX_COORDINATE`] is
    /// rejected and leaves the state untouched.
    ///
    /// # Returns
    /// true if the update was applied
    pub fn update(&mut self, delta: GestureDelta, location: Point) -> bool {
        if !within_view_range(location) {
            return false;
        }
        match delta {
            GestureDelta::Pan(offset) => {
                if !within_view_range(offset) {
                    return false;
                }
                self.offset = offset;
            }
            GestureDelta::Zoom(scale) => {
                if !(scale.is_finite() && scale > 0.0) {
                    return false;
                }
                self.scale = scale;
            }
            GestureDelta::Rotate(rotation) => {
                if !rotation.is_finite() {
                    return false;
                }
                self.rotation = rotation;
            }
        }
        self.pivot = location;
        true
    }

    /// Returns the transform to identity without touching the bitmap
    pub fn reset(&mut self) {
        self.offset = Point::ZERO;
        self.scale = 1.0;
        self.rotation = 0.0;
        self.pivot = Point::ZERO;
    }

    /// True when a scale or rotation about the pivot must be applied
    pub fn has_scale_or_rotation(&self) -> bool {
        self.scale != 1.0 || self.rotation != 0.0
    }

    /// True when the state is the identity transform
    pub fn is_identity(&self) -> bool {
        self.offset.is_zero() && !self.has_scale_or_rotation() && self.pivot.is_zero()
    }
}
