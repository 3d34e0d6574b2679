//! Application controller and coordination layer
//!
//! The controller is the application root: it owns the single engine handle
//! and every piece of shell state, and lends the engine to each component
//! per call. All events arrive on one thread, one at a time, so a commit
//! always finishes resetting state before the next gesture is seen.

use tiny_skia::Pixmap;
use tracing::{debug, info, warn};

use crate::app::commit::{CommitError, TransformCommitProtocol};
use crate::app::navigation::{NavigationStateMachine, NavigationUpdate};
use crate::app::route::{RouteEndpointTracker, TapOutcome};
use crate::app::state::{GestureSession, SessionAction, SessionEvent, StateMachine};
use crate::config::{ConfigError, ShellConfig};
use crate::domain::core::Point;
use crate::domain::gesture::{GestureDelta, ManipulationEvent};
use crate::domain::navigation::PositionFix;
use crate::domain::route::RouteEndpoints;
use crate::domain::transform::GestureTransformState;
use crate::engine::{EngineError, MapEngine};
use crate::input::{KeyBindings, KeyEvent, MouseGestures, PointerEvent};
use crate::ui::{PreviewError, PreviewLayout, PreviewRenderer};

/// Application errors that can occur during controller operations
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Preview error: {0}")]
    Preview(#[from] PreviewError),

    #[error("Commit error: {0}")]
    Commit(#[from] CommitError),
}

/// Main application controller
pub struct MapController<E: MapEngine> {
    engine: E,
    config: ShellConfig,
    session: GestureSession,
    transform: GestureTransformState,
    commit: TransformCommitProtocol,
    routes: RouteEndpointTracker,
    navigator: NavigationStateMachine,
    renderer: PreviewRenderer,
    mouse: MouseGestures,
    keys: KeyBindings,
    /// Engine view moved while a gesture was previewing; refetch when it ends
    bitmap_stale: bool,
    redraw_requested: bool,
}

impl<E: MapEngine> MapController<E> {
    /// Creates the controller and fetches the first map bitmap
    ///
    /// # Returns
    /// MapController instance or AppError if the configuration is invalid
    /// or the engine cannot render
    pub fn new(mut engine: E, config: ShellConfig) -> Result<Self, AppError> {
        config.validate()?;

        let mut transform = GestureTransformState::new();
        transform.set_bitmap(engine.rendered_bitmap()?);

        info!(
            width = config.view_width,
            height = config.view_height,
            device_scale = config.device_scale,
            "map controller ready"
        );

        Ok(Self {
            commit: TransformCommitProtocol::new(config.view_rect(), config.device_scale),
            routes: RouteEndpointTracker::new(config.device_scale),
            navigator: NavigationStateMachine::new(config.metric_units),
            renderer: PreviewRenderer::new(),
            mouse: MouseGestures::new(config.tap_slop, config.wheel_zoom_factor),
            keys: KeyBindings {
                pan_step: config.key_pan_step,
                zoom_factor: config.key_zoom_factor,
                rotate_step: config.key_rotate_step,
            },
            engine,
            config,
            session: GestureSession::Idle,
            transform,
            bitmap_stale: false,
            redraw_requested: true,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn session(&self) -> GestureSession {
        self.session
    }

    pub fn transform(&self) -> &GestureTransformState {
        &self.transform
    }

    pub fn route_endpoints(&self) -> &RouteEndpoints {
        self.routes.endpoints()
    }

    pub fn navigator(&self) -> &NavigationStateMachine {
        &self.navigator
    }

    /// Returns and clears the pending redraw request
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::replace(&mut self.redraw_requested, false)
    }

    /// Handles one event of the manipulation stream
    pub fn handle_event(&mut self, event: ManipulationEvent) {
        match event {
            ManipulationEvent::Changed { delta, location } => {
                self.handle_change(delta, location);
            }
            ManipulationEvent::Ended(kind) => {
                let action = self.transition(SessionEvent::Ended(kind));
                if action == SessionAction::Commit {
                    self.commit_gesture();
                }
            }
            ManipulationEvent::Cancelled(kind) => {
                let action = self.transition(SessionEvent::Cancelled(kind));
                if action == SessionAction::Cancel {
                    self.cancel_gesture();
                }
            }
            ManipulationEvent::Tap(at) => self.handle_tap(at),
        }
    }

    /// Handles one mouse event of the desktop shell
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        for manipulation in self.mouse.translate(event) {
            self.handle_event(manipulation);
        }
    }

    /// Handles one key of the desktop shell
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key {
            KeyEvent::Cancel => {
                for manipulation in self.mouse.cancel_drag() {
                    self.handle_event(manipulation);
                }
                return;
            }
            KeyEvent::ClearRoute => {
                self.clear_route();
                return;
            }
            _ => {}
        }

        if self.session.is_active() {
            debug!(?key, "key ignored while a gesture is in progress");
            return;
        }

        let Some(command) = self.keys.command_for(key) else {
            return;
        };
        match command.apply(&mut self.engine) {
            Ok(()) => {
                debug!(?command, "key command applied");
                self.refresh_bitmap();
            }
            Err(err) => warn!(?command, error = %err, "engine rejected key command"),
        }
    }

    /// Feeds a position fix to the navigator
    ///
    /// # Returns
    /// The new navigation update, or None if the engine rejected the fix
    pub fn navigate(&mut self, fix: &PositionFix) -> Option<NavigationUpdate> {
        match self.navigator.navigate(&mut self.engine, fix) {
            Ok(update) => {
                let update = update.clone();
                // the engine may have moved the view to follow the position
                if self.session.is_active() {
                    self.bitmap_stale = true;
                } else {
                    self.refresh_bitmap();
                }
                Some(update)
            }
            Err(err) => {
                warn!(error = %err, "engine rejected position fix");
                None
            }
        }
    }

    /// Forgets the route endpoints and the navigation instruction
    ///
    /// The next tap only primes a new start point.
    pub fn clear_route(&mut self) {
        self.routes.reset();
        self.navigator.clear();
        self.redraw_requested = true;
        info!("route cleared");
    }

    /// Renders the current preview frame
    pub fn frame(&self) -> Result<Pixmap, AppError> {
        let bitmap = self.transform.bitmap().ok_or(PreviewError::NoBitmap)?;
        let (width, height) = self.config.device_size();
        let layout = PreviewLayout::from_state(
            &self.transform,
            width,
            height,
            self.config.device_scale,
            self.config.flip_vertical,
        );
        Ok(self.renderer.render(&layout, bitmap)?)
    }

    fn transition(&mut self, event: SessionEvent) -> SessionAction {
        let (next, action) = StateMachine::process_event(self.session, event);
        debug!(?event, ?action, "gesture session transition");
        self.session = next;
        action
    }

    fn handle_change(&mut self, delta: GestureDelta, location: Point) {
        match self.transition(SessionEvent::Changed(delta.kind())) {
            SessionAction::Begin => self.transform.begin_gesture(),
            SessionAction::Update => {}
            _ => return,
        }
        if self.transform.update(delta, location) {
            self.redraw_requested = true;
        } else {
            debug!(?delta, "rejected out-of-range gesture value");
        }
    }

    fn commit_gesture(&mut self) {
        match self.commit.commit(&mut self.transform, &mut self.engine) {
            Ok(commands) => {
                debug!(count = commands.len(), "gesture committed");
                self.bitmap_stale = false;
            }
            Err(err) => {
                warn!(error = %err, "gesture commit failed; keeping last bitmap");
                self.bitmap_stale = true;
            }
        }
        self.redraw_requested = true;
    }

    fn cancel_gesture(&mut self) {
        self.commit.cancel(&mut self.transform);
        if self.bitmap_stale {
            self.refresh_bitmap();
        }
        self.redraw_requested = true;
    }

    fn handle_tap(&mut self, at: Point) {
        if self.session.is_active() {
            debug!("tap ignored while a gesture is in progress");
            return;
        }
        match self.routes.record_tap(&mut self.engine, at) {
            Ok(TapOutcome::Primed(position)) => {
                debug!(lon = position.lon, lat = position.lat, "route start primed");
            }
            Ok(TapOutcome::RouteInstalled { .. }) => self.refresh_bitmap(),
            Err(err) => warn!(error = %err, "route request failed; map unchanged"),
        }
    }

    fn refresh_bitmap(&mut self) {
        match self.engine.rendered_bitmap() {
            Ok(bitmap) => {
                self.transform.set_bitmap(bitmap);
                self.bitmap_stale = false;
                self.redraw_requested = true;
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch rendered bitmap");
                self.bitmap_stale = true;
            }
        }
    }
}
