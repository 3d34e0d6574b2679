//! External map engine call surface
//!
//! The engine owns rendering, routing, coordinate conversion and turn
//! analysis. The shell reaches it only through [`MapEngine`]; one handle is
//! created by the application root and lent to each component by `&mut`.

pub mod recording;

use tiny_skia::Pixmap;

use crate::domain::core::{GeoPoint, Point};
use crate::domain::navigation::{NavigationState, PositionFix, TurnDescriptor};

pub use recording::{EngineCall, NavigatorScript, RecordingEngine};

/// Coordinate systems understood by [`MapEngine::convert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordType {
    /// Device pixels relative to the top-left of the map view
    Screen,
    /// Longitude and latitude in degrees
    Degree,
}

/// Engine status codes with a dedicated meaning
const STATUS_NONE: i32 = 0;
const STATUS_NO_ROUTE: i32 = 28;
const STATUS_NO_ROADS_NEAR_START: i32 = 59;
const STATUS_NO_ROADS_NEAR_END: i32 = 60;
const STATUS_NO_ROUTE_CONNECTIVITY: i32 = 61;

/// Failures reported by the engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("No route exists between the requested points")]
    NoRoute,

    #[error("No road near the start of the route")]
    NoRoadsNearStart,

    #[error("No road near the end of the route")]
    NoRoadsNearEnd,

    #[error("Coordinate conversion out of range: ({x}, {y})")]
    ConversionOutOfRange { x: f64, y: f64 },

    #[error("Engine has not rendered a bitmap")]
    NoBitmap,

    #[error("Engine call `{call}` failed with status {status}")]
    Status { call: &'static str, status: i32 },
}

impl EngineError {
    /// Maps a raw engine status to a result
    ///
    /// # Arguments
    /// * `call` - Name of the engine call, used in the error message
    /// * `status` - Raw status, zero meaning success
    pub fn check(call: &'static str, status: i32) -> Result<(), EngineError> {
        match status {
            STATUS_NONE => Ok(()),
            STATUS_NO_ROUTE | STATUS_NO_ROUTE_CONNECTIVITY => Err(EngineError::NoRoute),
            STATUS_NO_ROADS_NEAR_START => Err(EngineError::NoRoadsNearStart),
            STATUS_NO_ROADS_NEAR_END => Err(EngineError::NoRoadsNearEnd),
            status => Err(EngineError::Status { call, status }),
        }
    }
}

/// The fixed call surface of the external mapping/navigation engine
///
/// All calls are synchronous and are only ever issued from the UI thread,
/// one at a time.
pub trait MapEngine {
    /// Latest rendered map image
    fn rendered_bitmap(&mut self) -> Result<Pixmap, EngineError>;

    /// Converts a point between coordinate systems
    fn convert(&self, point: Point, from: CoordType, to: CoordType) -> Result<Point, EngineError>;

    /// Shifts the viewport by whole device pixels
    fn pan(&mut self, dx: i32, dy: i32) -> Result<(), EngineError>;

    /// Multiplies the current scale by `factor`, about the view center
    fn zoom(&mut self, factor: f64) -> Result<(), EngineError>;

    /// Adds `degrees` to the current rotation, about the view center
    fn rotate(&mut self, degrees: f64) -> Result<(), EngineError>;

    /// Computes and installs a route
    fn start_navigation(&mut self, from: GeoPoint, to: GeoPoint) -> Result<(), EngineError>;

    /// Feeds one position fix to the navigator
    fn navigate(&mut self, fix: &PositionFix) -> Result<(), EngineError>;

    /// Upcoming turn, if a route is installed
    fn first_turn(&self) -> Option<TurnDescriptor>;

    /// Turn after the upcoming one, if any
    fn second_turn(&self) -> Option<TurnDescriptor>;

    /// Navigation state produced by the last fix
    fn navigation_state(&self) -> NavigationState;

    /// Remaining route length in meters, when navigating
    fn distance_to_destination(&self) -> Option<f64> {
        None
    }

    /// Estimated remaining travel time in seconds, when navigating
    fn estimated_time_to_destination(&self) -> Option<f64> {
        None
    }

    /// Converts a device point in the view to geographic degrees
    fn screen_to_degrees(&self, point: Point) -> Result<GeoPoint, EngineError> {
        let p = self.convert(point, CoordType::Screen, CoordType::Degree)?;
        Ok(GeoPoint::new(p.x, p.y))
    }
}
