//! The focus timer: advances a progress fraction from 0 to 1 over a fixed
//! number of seconds, one animation frame at a time.
//!
//! The timer never reads the time itself. Callers pass frame timestamps in
//! milliseconds, either directly via [`FocusTimer::tick`] or through a
//! [`Clock`]. The browser app uses `performance.now()`; tests use
//! [`ManualClock`].

use crate::FlightError;
use log::{debug, info};
use std::cell::Cell;
use std::num::NonZeroU32;

/// Source of frame timestamps in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance_ms(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance_ms(secs * 1000.0);
    }

    pub fn set_ms(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Complete,
}

/// What the frame loop should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// Schedule another frame.
    Continue,
    /// Stop scheduling frames.
    Stop,
}

/// Timer values the UI renders from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub progress: f64,
    pub elapsed_seconds: u32,
    pub remaining_seconds: u32,
    pub is_complete: bool,
}

#[derive(Debug, Clone)]
pub struct FocusTimer {
    total_seconds: u32,
    state: TimerState,
    /// Timestamp of the first frame of the current run.
    start_ms: Option<f64>,
    /// Seconds accumulated by runs before the last pause.
    banked: f64,
    elapsed: f64,
    progress: f64,
}

impl FocusTimer {
    pub fn new(total_seconds: u32) -> Result<Self, FlightError> {
        NonZeroU32::new(total_seconds)
            .map(Self::with_duration)
            .ok_or(FlightError::InvalidDuration(total_seconds))
    }

    pub fn with_duration(total_seconds: NonZeroU32) -> Self {
        Self {
            total_seconds: total_seconds.get(),
            state: TimerState::Idle,
            start_ms: None,
            banked: 0.0,
            elapsed: 0.0,
            progress: 0.0,
        }
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Start from idle or resume from pause. Elapsed time before a pause
    /// is kept; the next frame becomes the new start reference.
    pub fn start(&mut self) {
        match self.state {
            TimerState::Idle | TimerState::Paused => {
                self.state = TimerState::Running;
                self.start_ms = None;
                info!(
                    "Focus timer running: {:.1}/{}s",
                    self.elapsed, self.total_seconds
                );
            }
            TimerState::Running | TimerState::Complete => {}
        }
    }

    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
            self.banked = self.elapsed;
            self.start_ms = None;
            info!("Focus timer paused at {:.1}s", self.elapsed);
        }
    }

    pub fn reset(&mut self) {
        debug!("Focus timer reset from {:?}", self.state);
        self.state = TimerState::Idle;
        self.start_ms = None;
        self.banked = 0.0;
        self.elapsed = 0.0;
        self.progress = 0.0;
    }

    /// Advance to the frame at `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> FrameRequest {
        if self.state != TimerState::Running {
            return FrameRequest::Stop;
        }

        let start = *self.start_ms.get_or_insert(now_ms);
        let total = f64::from(self.total_seconds);
        let run = ((now_ms - start) / 1000.0).max(0.0);
        let elapsed = (self.banked + run).min(total);

        // a frame stamped earlier than the last one must not move us back
        self.elapsed = self.elapsed.max(elapsed);
        self.progress = (self.elapsed / total).min(1.0);

        if self.elapsed < total {
            FrameRequest::Continue
        } else {
            self.state = TimerState::Complete;
            info!("Focus session complete after {}s", self.total_seconds);
            FrameRequest::Stop
        }
    }

    pub fn tick_with<C: Clock + ?Sized>(&mut self, clock: &C) -> FrameRequest {
        self.tick(clock.now_ms())
    }

    /// Feed simulated frame timestamps until the timer asks to stop.
    /// Returns how many frames were consumed.
    pub fn drive<I>(&mut self, frames: I) -> usize
    where
        I: IntoIterator<Item = f64>,
    {
        let mut consumed = 0;
        for now in frames {
            consumed += 1;
            if self.tick(now) == FrameRequest::Stop {
                break;
            }
        }
        consumed
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed.floor() as u32
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.total_seconds.saturating_sub(self.elapsed_seconds())
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            progress: self.progress,
            elapsed_seconds: self.elapsed_seconds(),
            remaining_seconds: self.remaining_seconds(),
            is_complete: self.is_complete(),
        }
    }
}
