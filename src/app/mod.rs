//! Application orchestration layer
//!
//! Coordinates the gesture session, commit protocol, route tracking and
//! navigation around one engine handle owned by [`MapController`].

pub mod commit;
pub mod controller;
pub mod navigation;
pub mod route;
pub mod state;

pub use commit::{CommitError, TransformCommitProtocol, ViewCommand};
pub use controller::{AppError, MapController};
pub use navigation::{NavigationStateMachine, NavigationUpdate};
pub use route::{RouteEndpointTracker, TapOutcome};
pub use state::{GestureSession, SessionAction, SessionEvent, StateMachine};
