//! Gesture commit protocol
//!
//! Turns the accumulated interactive transform into the ordered engine
//! commands that reproduce it. The engine zooms and rotates about the view
//! center, so a scale or rotation about the pivot is sandwiched between a
//! pan that brings the pivot to the center and the pan that takes it back.

use tracing::{debug, warn};

use crate::domain::core::{DevicePoint, Rect};
use crate::domain::transform::GestureTransformState;
use crate::engine::{EngineError, MapEngine};

/// One primitive view command sent to the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewCommand {
    /// Move the viewport by device pixels
    Pan(DevicePoint),
    /// Multiply the scale about the view center
    Zoom(f64),
    /// Add degrees of rotation about the view center
    Rotate(f64),
}

impl ViewCommand {
    /// Sends this command to the engine
    pub fn apply<E: MapEngine + ?Sized>(&self, engine: &mut E) -> Result<(), EngineError> {
        match *self {
            ViewCommand::Pan(delta) => engine.pan(delta.x, delta.y),
            ViewCommand::Zoom(factor) => engine.zoom(factor),
            ViewCommand::Rotate(degrees) => engine.rotate(degrees),
        }
    }
}

/// Commit failures; local state has already been reset when these surface
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    #[error("Engine rejected {command:?} during commit")]
    Command {
        command: ViewCommand,
        #[source]
        source: EngineError,
    },

    #[error("Failed to fetch the bitmap rendered after commit")]
    Refresh(#[source] EngineError),
}

/// Commits or discards the interactive transform of one gesture
#[derive(Debug, Clone, Copy)]
pub struct TransformCommitProtocol {
    /// View bounds in logical units
    view: Rect,
    /// Device pixels per logical unit
    device_scale: f64,
}

impl TransformCommitProtocol {
    pub fn new(view: Rect, device_scale: f64) -> Self {
        Self { view, device_scale }
    }

    /// Computes the ordered engine commands for `state`
    ///
    /// The pan undoing the content offset always comes first. When a scale
    /// or rotation is present it is followed by pan to pivot, zoom, rotate,
    /// pan back; the two pivot pans are exact negatives of each other.
    pub fn plan(&self, state: &GestureTransformState) -> Vec<ViewCommand> {
        let mut commands = Vec::with_capacity(5);
        commands.push(ViewCommand::Pan((-state.offset()).to_device(self.device_scale)));

        if state.has_scale_or_rotation() {
            let pivot_offset = (self.view.center() - state.pivot()).to_device(self.device_scale);
            commands.push(ViewCommand::Pan(-pivot_offset));
            commands.push(ViewCommand::Zoom(state.scale()));
            commands.push(ViewCommand::Rotate(state.rotation().to_degrees()));
            commands.push(ViewCommand::Pan(pivot_offset));
        }

        commands
    }

    /// Sends the gesture to the engine, then resets and refreshes the state
    ///
    /// Local state is reset whether or not the engine accepts every step;
    /// no rollback is attempted. On success the bitmap in `state` is
    /// replaced with the engine's new rendering.
    ///
    /// # Returns
    /// The commands that were sent
    pub fn commit<E: MapEngine + ?Sized>(
        &self,
        state: &mut GestureTransformState,
        engine: &mut E,
    ) -> Result<Vec<ViewCommand>, CommitError> {
        let commands = self.plan(state);
        state.reset();

        for command in &commands {
            debug!(?command, "committing view command");
            command.apply(engine).map_err(|source| {
                warn!(?command, error = %source, "engine rejected commit step");
                CommitError::Command {
                    command: *command,
                    source,
                }
            })?;
        }

        let bitmap = engine.rendered_bitmap().map_err(CommitError::Refresh)?;
        state.set_bitmap(bitmap);
        Ok(commands)
    }

    /// Discards the uncommitted transform without touching the engine
    pub fn cancel(&self, state: &mut GestureTransformState) {
        debug!("discarding uncommitted gesture transform");
        state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::core::Point;
    use crate::domain::gesture::GestureDelta;

    fn protocol() -> TransformCommitProtocol {
        TransformCommitProtocol::new(Rect::new(0.0, 0.0, 400.0, 300.0), 2.0)
    }

    #[test]
    fn pure_pan_plans_single_inverted_pan() {
        let mut state = GestureTransformState::new();
        state.update(GestureDelta::Pan(Point::new(10.0, -5.0)), Point::new(50.0, 50.0));

        assert_eq!(
            protocol().plan(&state),
            vec![ViewCommand::Pan(DevicePoint::new(-20, 10))]
        );
    }

    #[test]
    fn identity_still_plans_one_pan() {
        let state = GestureTransformState::new();
        assert_eq!(
            protocol().plan(&state),
            vec![ViewCommand::Pan(DevicePoint::new(0, 0))]
        );
    }

    #[test]
    fn zoom_plans_pivot_sandwich() {
        let mut state = GestureTransformState::new();
        state.update(GestureDelta::Zoom(2.0), Point::new(100.0, 100.0));

        let plan = protocol().plan(&state);
        // center (200, 150) minus pivot (100, 100), doubled to device pixels
        assert_eq!(
            plan,
            vec![
                ViewCommand::Pan(DevicePoint::new(0, 0)),
                ViewCommand::Pan(DevicePoint::new(-200, -100)),
                ViewCommand::Zoom(2.0),
                ViewCommand::Rotate(0.0),
                ViewCommand::Pan(DevicePoint::new(200, 100)),
            ]
        );
    }

    #[test]
    fn rotation_alone_triggers_sandwich_in_degrees() {
        let mut state = GestureTransformState::new();
        state.update(
            GestureDelta::Rotate(std::f64::consts::FRAC_PI_2),
            Point::new(200.0, 150.0),
        );

        let plan = protocol().plan(&state);
        assert_eq!(plan.len(), 5);
        assert_eq!(plan[2], ViewCommand::Zoom(1.0));
        match plan[3] {
            ViewCommand::Rotate(degrees) => assert!((degrees - 90.0).abs() < 1e-9),
            other => panic!("expected rotate, got {:?}", other),
        }
        assert_eq!(plan[1], ViewCommand::Pan(DevicePoint::new(0, 0)));
    }

    #[test]
    fn cancel_resets_to_identity() {
        let mut state = GestureTransformState::new();
        state.update(GestureDelta::Zoom(3.0), Point::new(1.0, 2.0));
        state.update(GestureDelta::Pan(Point::new(4.0, 4.0)), Point::new(1.0, 2.0));
        protocol().cancel(&mut state);
        assert!(state.is_identity());
    }
}
