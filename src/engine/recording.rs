//! In-process engine that records every command
//!
//! Keeps a real view model (center, scale, rotation) so that the effect of a
//! command sequence can be checked, serves plain bitmaps, and replays a
//! scripted navigator. Used by the demo binary and by tests.

use std::collections::HashMap;

use tiny_skia::{Color, Pixmap};
use tracing::debug;

use crate::domain::core::{GeoPoint, Point};
use crate::domain::navigation::{NavigationState, PositionFix, TurnDescriptor};
use crate::engine::{CoordType, EngineError, MapEngine};

/// One state-changing call received by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    RenderedBitmap,
    Pan { dx: i32, dy: i32 },
    Zoom(f64),
    Rotate(f64),
    StartNavigation { from: GeoPoint, to: GeoPoint },
    Navigate(PositionFix),
}

impl EngineCall {
    /// Name used for failure injection
    pub fn name(&self) -> &'static str {
        match self {
            EngineCall::RenderedBitmap => "rendered_bitmap",
            EngineCall::Pan { .. } => "pan",
            EngineCall::Zoom(_) => "zoom",
            EngineCall::Rotate(_) => "rotate",
            EngineCall::StartNavigation { .. } => "start_navigation",
            EngineCall::Navigate(_) => "navigate",
        }
    }

    /// True for the calls that move the view
    pub fn is_view_command(&self) -> bool {
        matches!(
            self,
            EngineCall::Pan { .. } | EngineCall::Zoom(_) | EngineCall::Rotate(_)
        )
    }
}

/// Scripted navigator output returned after each fix
#[derive(Debug, Clone, Default)]
pub struct NavigatorScript {
    pub state: NavigationState,
    pub first_turn: Option<TurnDescriptor>,
    pub second_turn: Option<TurnDescriptor>,
    pub distance_to_destination: Option<f64>,
    pub time_to_destination: Option<f64>,
}

/// Engine double with a recorded call log
#[derive(Debug)]
pub struct RecordingEngine {
    width: u32,
    height: u32,
    /// Map point (degrees) shown at the view center
    center: Point,
    /// Device pixels per degree
    scale: f64,
    /// View rotation in degrees; positive turns the content clockwise on screen
    rotation: f64,
    calls: Vec<EngineCall>,
    failures: HashMap<&'static str, EngineError>,
    script: NavigatorScript,
    current: NavigatorScript,
    renders: u32,
    last_bitmap: Option<Pixmap>,
    /// Status the next route searches report
    route_status: i32,
}

impl RecordingEngine {
    /// Creates an engine with a `width` x `height` device pixel view
    ///
    /// # Arguments
    /// * `center` - Geographic point shown at the view center
    /// * `pixels_per_degree` - Initial scale
    pub fn new(width: u32, height: u32, center: GeoPoint, pixels_per_degree: f64) -> Self {
        Self {
            width,
            height,
            center: Point::new(center.lon, center.lat),
            scale: pixels_per_degree,
            rotation: 0.0,
            calls: Vec::new(),
            failures: HashMap::new(),
            script: NavigatorScript::default(),
            current: NavigatorScript::default(),
            renders: 0,
            last_bitmap: None,
            route_status: 0,
        }
    }

    /// All recorded calls, oldest first
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// Recorded pan/zoom/rotate calls only
    pub fn view_commands(&self) -> Vec<EngineCall> {
        self.calls
            .iter()
            .filter(|call| call.is_view_command())
            .cloned()
            .collect()
    }

    /// Forgets the recorded calls
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Makes every later call named `call` fail with `error`
    pub fn fail_call(&mut self, call: &'static str, error: EngineError) {
        self.failures.insert(call, error);
    }

    /// Removes all injected failures
    pub fn clear_failures(&mut self) {
        self.failures.clear();
    }

    /// Sets the raw status code that the next route searches return
    pub fn script_route_status(&mut self, status: i32) {
        self.route_status = status;
    }

    /// Sets the navigator output that the next fixes will produce
    pub fn script_navigation(&mut self, script: NavigatorScript) {
        self.script = script;
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Number of bitmaps rendered so far
    pub fn renders(&self) -> u32 {
        self.renders
    }

    /// Copy of the most recently served bitmap
    pub fn last_bitmap(&self) -> Option<&Pixmap> {
        self.last_bitmap.as_ref()
    }

    /// Map point currently displayed at device point `screen`
    pub fn map_point_at(&self, screen: Point) -> Point {
        let view_center = Point::new(self.width as f64 / 2.0, self.height as f64 / 2.0);
        self.center + self.screen_vector_to_map(screen - view_center)
    }

    /// Device point at which map point `map` is displayed
    pub fn screen_point_of(&self, map: Point) -> Point {
        let view_center = Point::new(self.width as f64 / 2.0, self.height as f64 / 2.0);
        let v = (map - self.center).scaled(self.scale);
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        view_center + Point::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
    }

    fn screen_vector_to_map(&self, v: Point) -> Point {
        let (sin, cos) = (-self.rotation.to_radians()).sin_cos();
        Point::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos).scaled(1.0 / self.scale)
    }

    fn record(&mut self, call: EngineCall) -> Result<(), EngineError> {
        debug!(call = call.name(), "engine call");
        let name = call.name();
        self.calls.push(call);
        match self.failures.get(name) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Paints the top-left quarter red so the bitmap orientation is visible
fn mark_top_left(pixmap: &mut Pixmap) {
    let width = pixmap.width() as usize;
    let (marked_w, marked_h) = (width.div_ceil(4), (pixmap.height() as usize).div_ceil(4));
    let data = pixmap.data_mut();
    for y in 0..marked_h {
        for x in 0..marked_w {
            let i = (y * width + x) * 4;
            data[i..i + 4].copy_from_slice(&[255, 0, 0, 255]);
        }
    }
}

impl MapEngine for RecordingEngine {
    fn rendered_bitmap(&mut self) -> Result<Pixmap, EngineError> {
        self.record(EngineCall::RenderedBitmap)?;
        let mut pixmap = Pixmap::new(self.width, self.height).ok_or(EngineError::NoBitmap)?;
        self.renders += 1;
        let shade = (self.renders % 256) as u8;
        pixmap.fill(Color::from_rgba8(shade, 128, 255 - shade, 255));
        mark_top_left(&mut pixmap);
        self.last_bitmap = Some(pixmap.clone());
        Ok(pixmap)
    }

    fn convert(&self, point: Point, from: CoordType, to: CoordType) -> Result<Point, EngineError> {
        if !(point.x.is_finite() && point.y.is_finite()) {
            return Err(EngineError::ConversionOutOfRange {
                x: point.x,
                y: point.y,
            });
        }
        match (from, to) {
            (CoordType::Screen, CoordType::Degree) => Ok(self.map_point_at(point)),
            (CoordType::Degree, CoordType::Screen) => Ok(self.screen_point_of(point)),
            _ => Ok(point),
        }
    }

    fn pan(&mut self, dx: i32, dy: i32) -> Result<(), EngineError> {
        self.record(EngineCall::Pan { dx, dy })?;
        self.center = self.center + self.screen_vector_to_map(Point::new(dx as f64, dy as f64));
        Ok(())
    }

    fn zoom(&mut self, factor: f64) -> Result<(), EngineError> {
        self.record(EngineCall::Zoom(factor))?;
        self.scale *= factor;
        Ok(())
    }

    fn rotate(&mut self, degrees: f64) -> Result<(), EngineError> {
        self.record(EngineCall::Rotate(degrees))?;
        self.rotation += degrees;
        Ok(())
    }

    fn start_navigation(&mut self, from: GeoPoint, to: GeoPoint) -> Result<(), EngineError> {
        self.record(EngineCall::StartNavigation { from, to })?;
        EngineError::check("start_navigation", self.route_status)
    }

    fn navigate(&mut self, fix: &PositionFix) -> Result<(), EngineError> {
        self.record(EngineCall::Navigate(*fix))?;
        self.current = self.script.clone();
        Ok(())
    }

    fn first_turn(&self) -> Option<TurnDescriptor> {
        self.current.first_turn.clone()
    }

    fn second_turn(&self) -> Option<TurnDescriptor> {
        self.current.second_turn.clone()
    }

    fn navigation_state(&self) -> NavigationState {
        self.current.state
    }

    fn distance_to_destination(&self) -> Option<f64> {
        self.current.distance_to_destination
    }

    fn estimated_time_to_destination(&self) -> Option<f64> {
        self.current.time_to_destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RecordingEngine {
        RecordingEngine::new(200, 100, GeoPoint::new(-71.0, 42.0), 1000.0)
    }

    fn assert_close(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn view_center_shows_initial_center() {
        let engine = engine();
        assert_close(engine.map_point_at(Point::new(100.0, 50.0)), Point::new(-71.0, 42.0));
    }

    #[test]
    fn pan_moves_viewport() {
        let mut engine = engine();
        let right_of_center = engine.map_point_at(Point::new(110.0, 50.0));
        engine.pan(10, 0).unwrap();
        assert_close(engine.map_point_at(Point::new(100.0, 50.0)), right_of_center);
    }

    #[test]
    fn conversion_round_trips_under_rotation() {
        let mut engine = engine();
        engine.rotate(30.0).unwrap();
        engine.zoom(2.0).unwrap();
        let screen = Point::new(37.0, 81.0);
        let map = engine.convert(screen, CoordType::Screen, CoordType::Degree).unwrap();
        let back = engine.convert(map, CoordType::Degree, CoordType::Screen).unwrap();
        assert_close(back, screen);
    }

    #[test]
    fn positive_rotation_turns_content_clockwise() {
        let mut engine = engine();
        let right_of_center = engine.map_point_at(Point::new(110.0, 50.0));
        engine.rotate(90.0).unwrap();
        assert_close(engine.screen_point_of(right_of_center), Point::new(100.0, 60.0));
    }

    #[test]
    fn route_status_maps_to_errors() {
        let mut engine = engine();
        let (from, to) = (GeoPoint::new(-71.0, 42.0), GeoPoint::new(-71.1, 42.1));
        assert_eq!(engine.start_navigation(from, to), Ok(()));
        engine.script_route_status(59);
        assert_eq!(engine.start_navigation(from, to), Err(EngineError::NoRoadsNearStart));
        assert_eq!(engine.calls().len(), 2);
    }

    #[test]
    fn bitmaps_mark_top_left_corner() {
        let mut engine = engine();
        let bitmap = engine.rendered_bitmap().unwrap();
        assert_eq!(bitmap.pixel(0, 0).unwrap().red(), 255);
        assert_ne!(bitmap.pixel(0, 99).unwrap().red(), 255);
        assert_eq!(engine.last_bitmap().unwrap().data(), bitmap.data());
    }

    #[test]
    fn calls_are_recorded_and_failures_injected() {
        let mut engine = engine();
        engine.fail_call("zoom", EngineError::Status { call: "zoom", status: 3 });
        engine.pan(1, 2).unwrap();
        assert!(engine.zoom(2.0).is_err());
        assert_eq!(engine.calls(), &[EngineCall::Pan { dx: 1, dy: 2 }, EngineCall::Zoom(2.0)]);
        assert_eq!(engine.scale(), 1000.0);
    }

    #[test]
    fn bitmaps_match_view_size() {
        let mut engine = engine();
        let bitmap = engine.rendered_bitmap().unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (200, 100));
        assert_eq!(engine.renders(), 1);
    }

    #[test]
    fn navigator_script_applies_after_fix() {
        let mut engine = engine();
        engine.script_navigation(NavigatorScript {
            state: NavigationState::OffRoute,
            ..NavigatorScript::default()
        });
        assert_eq!(engine.navigation_state(), NavigationState::None);
        engine.navigate(&PositionFix::at(1.0, -71.0, 42.0)).unwrap();
        assert_eq!(engine.navigation_state(), NavigationState::OffRoute);
    }
}
