//! Core domain types and operations
//!
//! This module defines the geometric building blocks shared by every layer.
//! View-local coordinates are logical units (device pixels divided by the
//! device scale factor); geographic coordinates are degrees.

use std::ops::{Add, Neg, Sub};

/// Point or displacement in view-local logical units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Creates a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both components are exactly zero
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Scales both components by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Euclidean length when the point is read as a displacement
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Converts to whole device pixels, rounding half away from zero
    pub fn to_device(&self, device_scale: f64) -> DevicePoint {
        DevicePoint::new(
            (self.x * device_scale).round() as i32,
            (self.y * device_scale).round() as i32,
        )
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Point or displacement in whole device pixels, as the engine consumes them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DevicePoint {
    pub x: i32,
    pub y: i32,
}

impl DevicePoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Neg for DevicePoint {
    type Output = DevicePoint;

    fn neg(self) -> DevicePoint {
        DevicePoint::new(self.x.saturating_neg(), self.y.saturating_neg())
    }
}

/// Geographic position in degrees
///
/// The all-zero value doubles as "not set": the shells never place a route
/// endpoint at exactly 0°E 0°N.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Returns true if either coordinate is still at its default of zero
    pub fn is_default(&self) -> bool {
        self.lon == 0.0 || self.lat == 0.0
    }
}

/// Rectangle in view-local logical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// Creates a new rectangle
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the right edge coordinate
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Returns the bottom edge coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Returns the center of the rectangle
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Returns true if this rectangle contains the given point
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}
