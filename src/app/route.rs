//! Tap-driven route requests

use tracing::{debug, info};

use crate::domain::core::{GeoPoint, Point};
use crate::domain::route::RouteEndpoints;
use crate::engine::{EngineError, MapEngine};

/// Result of a tap that the engine accepted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    /// First tap of the session: only the start was primed
    Primed(GeoPoint),
    /// A route from `from` to `to` was installed
    RouteInstalled { from: GeoPoint, to: GeoPoint },
}

/// Pairs consecutive taps into route requests
#[derive(Debug, Clone)]
pub struct RouteEndpointTracker {
    endpoints: RouteEndpoints,
    device_scale: f64,
}

impl RouteEndpointTracker {
    pub fn new(device_scale: f64) -> Self {
        Self {
            endpoints: RouteEndpoints::new(),
            device_scale,
        }
    }

    pub fn endpoints(&self) -> &RouteEndpoints {
        &self.endpoints
    }

    /// Records a tap and requests a route once two points are known
    ///
    /// The tap is converted to degrees through the engine; the previous end
    /// becomes the new start. A failed conversion leaves the endpoints
    /// untouched. A failed route search keeps the shifted endpoints.
    ///
    /// # Arguments
    /// * `point` - Tap location in logical view units
    pub fn record_tap<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        point: Point,
    ) -> Result<TapOutcome, EngineError> {
        let position = engine.screen_to_degrees(point.scaled(self.device_scale))?;
        debug!(lon = position.lon, lat = position.lat, "route tap");

        match self.endpoints.push(position) {
            None => Ok(TapOutcome::Primed(position)),
            Some((from, to)) => {
                engine.start_navigation(from, to)?;
                info!(
                    from_lon = from.lon,
                    from_lat = from.lat,
                    to_lon = to.lon,
                    to_lat = to.lat,
                    "route installed"
                );
                Ok(TapOutcome::RouteInstalled { from, to })
            }
        }
    }

    /// Forgets both endpoints
    pub fn reset(&mut self) {
        self.endpoints.clear();
    }
}
