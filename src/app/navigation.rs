//! Navigation maneuver updates
//!
//! Each position fix is forwarded to the engine, after which the upcoming
//! turns and the navigator state are pulled and turned into one message.
//! Only the two latest turn descriptors are carried between updates, for
//! display; the message is always rebuilt from scratch.

use tracing::{debug, warn};

use crate::domain::navigation::{
    NavigationState, PositionFix, TurnDescriptor, maneuver_message, trip_summary,
};
use crate::engine::{EngineError, MapEngine};

/// Output of one navigator update
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavigationUpdate {
    pub state: NavigationState,
    /// Instruction line; None clears any previous instruction
    pub message: Option<String>,
    /// Remaining distance and time, when the engine knows them
    pub trip_summary: Option<String>,
}

/// Converts engine turn data into user-facing instructions
#[derive(Debug, Clone, Default)]
pub struct NavigationStateMachine {
    first_turn: Option<TurnDescriptor>,
    second_turn: Option<TurnDescriptor>,
    update: NavigationUpdate,
    metric_units: bool,
}

impl NavigationStateMachine {
    pub fn new(metric_units: bool) -> Self {
        Self {
            metric_units,
            ..Self::default()
        }
    }

    /// Upcoming turn from the latest update
    pub fn first_turn(&self) -> Option<&TurnDescriptor> {
        self.first_turn.as_ref()
    }

    /// Turn after the upcoming one, from the latest update
    pub fn second_turn(&self) -> Option<&TurnDescriptor> {
        self.second_turn.as_ref()
    }

    /// Current instruction line
    pub fn message(&self) -> Option<&str> {
        self.update.message.as_deref()
    }

    /// Latest complete update
    pub fn last_update(&self) -> &NavigationUpdate {
        &self.update
    }

    /// Feeds one fix and derives the new instruction
    ///
    /// If the engine rejects the fix, the previous update is left in place
    /// and the error is returned.
    pub fn navigate<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        fix: &PositionFix,
    ) -> Result<&NavigationUpdate, EngineError> {
        engine.navigate(fix)?;

        self.first_turn = engine.first_turn();
        self.second_turn = engine.second_turn();
        let state = engine.navigation_state();

        if matches!(state, NavigationState::Turn | NavigationState::Arrival)
            && self.first_turn.is_none()
        {
            warn!(?state, "engine reported no upcoming turn");
        }

        let message = maneuver_message(state, self.first_turn.as_ref(), self.second_turn.as_ref());
        let summary = trip_summary(
            state,
            engine.distance_to_destination(),
            engine.estimated_time_to_destination(),
            self.metric_units,
        );
        debug!(?state, message = message.as_deref().unwrap_or(""), "navigation update");

        self.update = NavigationUpdate {
            state,
            message,
            trip_summary: summary,
        };
        Ok(&self.update)
    }

    /// Clears turns and messages, as when navigation stops
    pub fn clear(&mut self) {
        self.first_turn = None;
        self.second_turn = None;
        self.update = NavigationUpdate::default();
    }
}
