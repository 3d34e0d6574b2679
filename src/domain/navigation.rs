//! Navigation maneuvers and their user-facing wording
//!
//! Turn descriptors and the navigation state come from the engine after each
//! position fix. This module turns them into the single instruction line
//! shown to the user, plus an optional trip summary line.

use std::ops::BitOr;

/// Geometric kind of a turn at a junction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnKind {
    /// No turn exists or is needed, as at the start of a route
    #[default]
    None,
    /// Less than 22.5 degrees either way
    Ahead,
    BearRight,
    Right,
    SharpRight,
    /// U-turn back along the same road
    Around,
    SharpLeft,
    Left,
    BearLeft,
}

impl TurnKind {
    /// Wording used when the engine supplies no instruction text
    pub fn default_command(&self) -> &'static str {
        match self {
            TurnKind::None => "continue",
            TurnKind::Ahead => "go straight",
            TurnKind::BearRight => "bear right",
            TurnKind::Right => "turn right",
            TurnKind::SharpRight => "turn sharp right",
            TurnKind::Around => "turn round",
            TurnKind::SharpLeft => "turn sharp left",
            TurnKind::Left => "turn left",
            TurnKind::BearLeft => "bear left",
        }
    }
}

/// One upcoming maneuver as reported by the engine
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TurnDescriptor {
    pub kind: TurnKind,
    /// Localized instruction text, e.g. "turn left"
    pub command: String,
    /// Meters until the maneuver
    pub distance: f64,
    /// Estimated seconds until the maneuver
    pub time: f64,
    /// True if this maneuver merely continues the current road
    pub continue_flag: bool,
}

impl TurnDescriptor {
    /// Creates a descriptor from its announced fields
    pub fn new(command: impl Into<String>, distance: f64, continue_flag: bool) -> Self {
        Self {
            command: command.into(),
            distance,
            continue_flag,
            ..Self::default()
        }
    }

    /// Sets the turn kind
    pub fn with_kind(mut self, kind: TurnKind) -> Self {
        self.kind = kind;
        self
    }

    /// Instruction text, falling back to the kind's wording when empty
    pub fn instruction(&self) -> &str {
        if self.command.is_empty() {
            self.kind.default_command()
        } else {
            &self.command
        }
    }

    /// "<command> after <distance>m", distance truncated to whole meters
    pub fn announcement(&self) -> String {
        format!("{} after {}m", self.instruction(), whole_meters(self.distance))
    }
}

/// Navigator state after a position fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationState {
    /// No action is needed
    #[default]
    None,
    /// A turn is approaching
    Turn,
    /// On the route but travelling the wrong way
    TurnRound,
    /// Off the route; a new route is being calculated
    NewRoute,
    /// The destination is near and no junctions remain
    Arrival,
    /// Off the route and no new route calculated yet
    OffRoute,
}

/// Validity flags of a position fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixValidity(u32);

impl FixValidity {
    pub const NONE: FixValidity = FixValidity(0);
    pub const POSITION: FixValidity = FixValidity(1);
    pub const TIME: FixValidity = FixValidity(2);
    pub const SPEED: FixValidity = FixValidity(4);
    pub const COURSE: FixValidity = FixValidity(8);
    pub const HEIGHT: FixValidity = FixValidity(16);

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: FixValidity) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for FixValidity {
    type Output = FixValidity;

    fn bitor(self, rhs: FixValidity) -> FixValidity {
        FixValidity(self.0 | rhs.0)
    }
}

/// One position fix fed to the navigator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionFix {
    pub validity: FixValidity,
    /// Seconds since an arbitrary epoch
    pub time: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
    /// Kilometers per hour
    pub speed: f64,
    /// Degrees clockwise from north
    pub bearing: f64,
    /// Meters above sea level
    pub height: f64,
}

impl PositionFix {
    /// A fix with only position and time known
    pub fn at(time: f64, lon: f64, lat: f64) -> Self {
        Self {
            validity: FixValidity::POSITION | FixValidity::TIME,
            time,
            lon,
            lat,
            ..Self::default()
        }
    }
}

pub const TURN_ROUND_MESSAGE: &str = "turn round at the next safe and legal opportunity";
pub const NEW_ROUTE_MESSAGE: &str = "calculating a new route";
pub const OFF_ROUTE_MESSAGE: &str = "off route";

/// Derives the single instruction line for one navigator update
///
/// A missing second turn omits the "then" clause. A missing first turn in a
/// state that needs it yields no message.
pub fn maneuver_message(
    state: NavigationState,
    first: Option<&TurnDescriptor>,
    second: Option<&TurnDescriptor>,
) -> Option<String> {
    match state {
        NavigationState::None => None,
        NavigationState::Turn => {
            let mut message = first?.announcement();
            if let Some(second) = second.filter(|turn| !turn.continue_flag) {
                message.push_str(" then ");
                message.push_str(&second.announcement());
            }
            Some(message)
        }
        NavigationState::TurnRound => Some(TURN_ROUND_MESSAGE.to_string()),
        NavigationState::NewRoute => Some(NEW_ROUTE_MESSAGE.to_string()),
        NavigationState::Arrival => {
            first.map(|turn| format!("arriving after {}m", whole_meters(turn.distance)))
        }
        NavigationState::OffRoute => Some(OFF_ROUTE_MESSAGE.to_string()),
    }
}

/// Derives the trip summary line, if the state warrants one
///
/// # Arguments
/// * `distance` - Meters to the destination, if known
/// * `time` - Seconds to the destination, if known
/// * `metric` - Metric or imperial wording
pub fn trip_summary(
    state: NavigationState,
    distance: Option<f64>,
    time: Option<f64>,
    metric: bool,
) -> Option<String> {
    let distance = distance?;
    match state {
        NavigationState::Turn | NavigationState::Arrival => {
            let mut text = format!("{} of trip remaining", format_distance(distance, metric));
            if let Some(time) = time {
                text.push_str("; ");
                text.push_str(&format_duration(time));
            }
            Some(text)
        }
        NavigationState::TurnRound => Some(format!(
            "{} of trip remaining",
            format_distance(distance, metric)
        )),
        _ => None,
    }
}

/// Formats a distance for display, coarsening precision as it grows
pub fn format_distance(meters: f64, metric: bool) -> String {
    if metric {
        if meters < 50.0 {
            format!("{} meters", meters.round() as i64)
        } else if meters < 250.0 {
            format!("{} meters", (meters / 10.0).round() as i64 * 10)
        } else if meters < 100_000.0 {
            format!("{:.1}km", meters / 1000.0)
        } else {
            format!("{:.0}km", meters / 1000.0)
        }
    } else {
        let yards = meters * 1.093_613_298;
        let miles = yards / 1760.0;
        if yards < 55.0 {
            format!("{} yards", yards.round() as i64)
        } else if yards < 220.0 {
            format!("{} yards", (yards / 10.0).round() as i64 * 10)
        } else if miles < 100.0 {
            format!("{:.1} miles", miles)
        } else {
            format!("{:.0} miles", miles)
        }
    }
}

/// Formats a duration as hours and minutes, or seconds under a minute
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as i64;
    let secs = total % 60;
    let minutes = (total / 60) % 60;
    let hours = total / 3600;

    if hours == 0 && minutes == 0 {
        return if secs == 1 {
            "1 second".to_string()
        } else {
            format!("{} seconds", secs)
        };
    }

    let mut text = String::new();
    if hours == 1 {
        text.push_str("1 hour ");
    } else if hours > 1 {
        text.push_str(&format!("{} hours ", hours));
    }
    if minutes == 1 {
        text.push_str("1 minute");
    } else if minutes > 1 {
        text.push_str(&format!("{} minutes", minutes));
    }
    text.trim_end().to_string()
}

fn whole_meters(distance: f64) -> i64 {
    distance as i64
}
