//! Two-tap route definition
//!
//! Each tap shifts the previous end point into the start slot. A route is
//! requestable once the start slot holds a real position.

use crate::domain::core::GeoPoint;

/// Start and end of the route being defined by taps
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteEndpoints {
    start: GeoPoint,
    end: GeoPoint,
}

impl RouteEndpoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> GeoPoint {
        self.start
    }

    pub fn end(&self) -> GeoPoint {
        self.end
    }

    /// Records a new end point
    ///
    /// Identical consecutive points are not deduplicated.
    ///
    /// # Returns
    /// The `(start, end)` pair to route, or None while the start is unset
    pub fn push(&mut self, point: GeoPoint) -> Option<(GeoPoint, GeoPoint)> {
        self.start = self.end;
        self.end = point;
        if self.start.is_default() {
            None
        } else {
            Some((self.start, self.end))
        }
    }

    /// Forgets both end points
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
