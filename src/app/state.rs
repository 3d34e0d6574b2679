//! Gesture session state management
//!
//! Concurrent recognizers (pan, pinch, twist) together form one gesture.
//! The session starts on the first change reported while idle and commits
//! when the last participating recognizer ends. Any cancellation discards
//! the whole gesture.

use crate::domain::gesture::GestureKind;

/// Recognizers currently participating in a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveGesture {
    pan: bool,
    zoom: bool,
    rotate: bool,
}

impl ActiveGesture {
    /// A gesture with only `kind` participating
    pub fn started_by(kind: GestureKind) -> Self {
        let mut active = Self::default();
        active.insert(kind);
        active
    }

    fn slot(&mut self, kind: GestureKind) -> &mut bool {
        match kind {
            GestureKind::Pan => &mut self.pan,
            GestureKind::Zoom => &mut self.zoom,
            GestureKind::Rotate => &mut self.rotate,
        }
    }

    pub fn insert(&mut self, kind: GestureKind) {
        *self.slot(kind) = true;
    }

    /// Removes `kind`, returning whether it was participating
    pub fn remove(&mut self, kind: GestureKind) -> bool {
        std::mem::replace(self.slot(kind), false)
    }

    pub fn contains(&self, kind: GestureKind) -> bool {
        match kind {
            GestureKind::Pan => self.pan,
            GestureKind::Zoom => self.zoom,
            GestureKind::Rotate => self.rotate,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.pan || self.zoom || self.rotate)
    }

    pub fn len(&self) -> usize {
        GestureKind::ALL.iter().filter(|kind| self.contains(**kind)).count()
    }
}

/// Gesture session state - idle or manipulating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureSession {
    /// No gesture in progress; the preview shows the committed bitmap
    #[default]
    Idle,
    /// Recognizers are reporting changes that are only previewed
    Active(ActiveGesture),
}

impl GestureSession {
    pub fn is_active(&self) -> bool {
        matches!(self, GestureSession::Active(_))
    }
}

/// Recognizer phase transitions fed to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Changed(GestureKind),
    Ended(GestureKind),
    Cancelled(GestureKind),
}

/// What the controller must do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Reset the transform, then apply the change
    Begin,
    /// Apply the change to the running gesture
    Update,
    /// Send the accumulated transform to the engine
    Commit,
    /// Discard the accumulated transform
    Cancel,
    /// Nothing to do
    Ignore,
}

/// State machine for gesture session transitions
pub struct StateMachine;

impl StateMachine {
    /// Processes a recognizer event and returns the new session and action
    pub fn process_event(
        current: GestureSession,
        event: SessionEvent,
    ) -> (GestureSession, SessionAction) {
        match (current, event) {
            (GestureSession::Idle, SessionEvent::Changed(kind)) => (
                GestureSession::Active(ActiveGesture::started_by(kind)),
                SessionAction::Begin,
            ),

            (GestureSession::Active(mut active), SessionEvent::Changed(kind)) => {
                active.insert(kind);
                (GestureSession::Active(active), SessionAction::Update)
            }

            (GestureSession::Active(mut active), SessionEvent::Ended(kind)) => {
                if !active.remove(kind) {
                    // A recognizer that never reported a change has nothing to commit
                    return (GestureSession::Active(active), SessionAction::Ignore);
                }
                if active.is_empty() {
                    (GestureSession::Idle, SessionAction::Commit)
                } else {
                    (GestureSession::Active(active), SessionAction::Ignore)
                }
            }

            (GestureSession::Active(_), SessionEvent::Cancelled(_)) => {
                (GestureSession::Idle, SessionAction::Cancel)
            }

            // End or cancel with no gesture in progress
            (GestureSession::Idle, _) => (GestureSession::Idle, SessionAction::Ignore),
        }
    }
}
