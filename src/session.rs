//! Screen flow of a focus flight: pick a route, check in, fly, land.

use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPhase {
    Select,
    CheckIn,
    InFlight,
    Completed,
    Cancelled,
}

impl FlightPhase {
    /// Whether the map screen is up.
    pub fn shows_map(self) -> bool {
        matches!(
            self,
            FlightPhase::InFlight | FlightPhase::Completed | FlightPhase::Cancelled
        )
    }

    /// The timer only advances in flight.
    pub fn timer_running(self) -> bool {
        self == FlightPhase::InFlight
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Pick the flight at this index on the route list.
    Choose(usize),
    /// Stub torn; the plane departs and the timer starts from zero.
    Board,
    /// Timer reached the end.
    Arrive,
    /// User ended the flight early.
    Cancel,
    BackToRoutes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightSession {
    pub phase: FlightPhase,
    pub selected: usize,
}

impl Default for FlightSession {
    fn default() -> Self {
        Self {
            phase: FlightPhase::Select,
            selected: 0,
        }
    }
}

impl FlightSession {
    /// The session after `event`. Events that make no sense in the current
    /// phase leave it unchanged.
    pub fn apply(self, event: SessionEvent) -> Self {
        use FlightPhase::*;

        let next = match (self.phase, event) {
            (Select, SessionEvent::Choose(index)) => Self {
                phase: CheckIn,
                selected: index,
            },
            (CheckIn, SessionEvent::Board) => Self {
                phase: InFlight,
                ..self
            },
            (InFlight, SessionEvent::Arrive) => Self {
                phase: Completed,
                ..self
            },
            (InFlight, SessionEvent::Cancel) => Self {
                phase: Cancelled,
                ..self
            },
            (CheckIn | Completed | Cancelled, SessionEvent::BackToRoutes) => Self {
                phase: Select,
                ..self
            },
            (phase, event) => {
                debug!("Ignoring {:?} in {:?}", event, phase);
                return self;
            }
        };

        info!("Flight phase {:?} -> {:?}", self.phase, next.phase);
        next
    }

    /// Whether `event` must also restart the focus timer.
    pub fn resets_timer(event: SessionEvent) -> bool {
        event == SessionEvent::Board
    }
}
