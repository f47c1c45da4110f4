//! Timer collaborator driving `GameEngine::tick`
//!
//! The clock is armed when a game starts, rearmed whenever the tick period
//! changes and stopped as soon as the game leaves the Running phase. A
//! disarmed clock never fires.

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::game::{GamePhase, TickOutcome};

/// What the driver should do with the clock after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockCommand {
    Keep,
    Rearm(Duration),
    Stop,
}

impl ClockCommand {
    pub fn after_tick(outcome: &TickOutcome, phase: GamePhase, speed: Duration) -> Self {
        if phase != GamePhase::Running {
            ClockCommand::Stop
        } else if outcome.speed_changed {
            ClockCommand::Rearm(speed)
        } else {
            ClockCommand::Keep
        }
    }
}

pub struct TickClock {
    interval: Option<Interval>,
    period: Option<Duration>,
}

impl TickClock {
    /// A disarmed clock
    pub fn new() -> Self {
        Self {
            interval: None,
            period: None,
        }
    }

    /// (Re)start the clock. The first tick fires one full period from now.
    pub fn arm(&mut self, period: Duration) {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
        self.period = Some(period);
    }

    /// Arm with a new period, leaving the clock alone if it already runs at it.
    /// Returns whether the clock was restarted.
    pub fn rearm(&mut self, period: Duration) -> bool {
        if self.period == Some(period) {
            return false;
        }
        self.arm(period);
        true
    }

    pub fn cancel(&mut self) {
        self.interval = None;
        self.period = None;
    }

    pub fn apply(&mut self, command: ClockCommand) {
        match command {
            ClockCommand::Keep => {}
            ClockCommand::Rearm(period) => {
                self.rearm(period);
            }
            ClockCommand::Stop => self.cancel(),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Wait for the next tick. Pending forever while disarmed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
