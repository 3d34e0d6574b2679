use map_shell::app::MapController;
use map_shell::config::ShellConfig;
use map_shell::domain::core::GeoPoint;
use map_shell::engine::RecordingEngine;

pub const CENTER: GeoPoint = GeoPoint {
    lon: -71.0,
    lat: 42.0,
};

/// A 400x300 view at unit device scale, with the startup calls cleared
pub fn controller() -> MapController<RecordingEngine> {
    controller_with(ShellConfig {
        view_width: 400.0,
        view_height: 300.0,
        ..ShellConfig::default()
    })
}

pub fn controller_with(config: ShellConfig) -> MapController<RecordingEngine> {
    let (width, height) = config.device_size();
    let engine = RecordingEngine::new(width, height, CENTER, 1000.0);
    let mut controller = MapController::new(engine, config).unwrap();
    controller.engine_mut().clear_calls();
    controller.take_redraw_request();
    controller
}
