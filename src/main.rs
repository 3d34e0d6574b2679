use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use map_shell::app::{AppError, MapController};
use map_shell::config::ShellConfig;
use map_shell::domain::core::{GeoPoint, Point};
use map_shell::domain::gesture::{GestureKind, ManipulationEvent};
use map_shell::domain::navigation::{NavigationState, PositionFix, TurnDescriptor};
use map_shell::engine::{NavigatorScript, RecordingEngine};
use map_shell::input::{KeyEvent, MouseButton, PointerEvent};
use map_shell::platform;

/// Initial map center of the demo session
const HOME: GeoPoint = GeoPoint {
    lon: -71.0589,
    lat: 42.3601,
};
const PIXELS_PER_DEGREE: f64 = 20_000.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run() {
        error!(error = %err, "map shell failed");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            ShellConfig::load(&path)?
        }
        None => ShellConfig {
            device_scale: platform::system_scale_factor(),
            ..ShellConfig::default()
        },
    };

    let (width, height) = config.device_size();
    let engine = RecordingEngine::new(width, height, HOME, PIXELS_PER_DEGREE);
    let mut controller = MapController::new(engine, config)?;

    drag(&mut controller, Point::new(100.0, 100.0), Point::new(160.0, 130.0));
    pinch(&mut controller, Point::new(300.0, 200.0), 1.5, 0.3);

    controller.handle_pointer(PointerEvent::Wheel {
        delta: 120,
        at: Point::new(400.0, 300.0),
    });
    for c in "ir".chars() {
        if let Some(key) = KeyEvent::from_char(c) {
            controller.handle_key(key);
        }
    }

    for at in [Point::new(200.0, 200.0), Point::new(500.0, 350.0)] {
        controller.handle_pointer(PointerEvent::Up {
            button: MouseButton::Right,
            at,
        });
    }
    let endpoints = *controller.route_endpoints();
    info!(start = ?endpoints.start(), end = ?endpoints.end(), "route endpoints");

    controller.engine_mut().script_navigation(NavigatorScript {
        state: NavigationState::Turn,
        first_turn: Some(TurnDescriptor::new("turn left", 180.0, false)),
        second_turn: Some(TurnDescriptor::new("turn right", 420.0, false)),
        distance_to_destination: Some(2_400.0),
        time_to_destination: Some(330.0),
    });
    let fix = PositionFix::at(0.0, endpoints.start().lon, endpoints.start().lat);
    if let Some(update) = controller.navigate(&fix) {
        info!(
            state = ?update.state,
            message = update.message.as_deref().unwrap_or(""),
            summary = update.trip_summary.as_deref().unwrap_or(""),
            "navigation"
        );
    }

    let frame = controller.frame()?;
    info!(
        width = frame.width(),
        height = frame.height(),
        engine_calls = controller.engine().calls().len(),
        scale = controller.engine().scale(),
        rotation = controller.engine().rotation(),
        "session finished"
    );
    Ok(())
}

fn drag(controller: &mut MapController<RecordingEngine>, from: Point, to: Point) {
    let midpoint = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
    controller.handle_pointer(PointerEvent::Down {
        button: MouseButton::Left,
        at: from,
    });
    controller.handle_pointer(PointerEvent::Move { at: midpoint });
    controller.handle_pointer(PointerEvent::Up {
        button: MouseButton::Left,
        at: to,
    });
}

fn pinch(controller: &mut MapController<RecordingEngine>, center: Point, scale: f64, rotation: f64) {
    for step in 1..=4 {
        let t = step as f64 / 4.0;
        controller.handle_event(ManipulationEvent::zoom(1.0 + (scale - 1.0) * t, center));
        controller.handle_event(ManipulationEvent::rotate(rotation * t, center));
    }
    controller.handle_event(ManipulationEvent::Ended(GestureKind::Rotate));
    controller.handle_event(ManipulationEvent::Ended(GestureKind::Zoom));
}
