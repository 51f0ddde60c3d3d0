use std::time::Duration;
use tokio::time::Instant;

/// Round lengths for the dealer's countdown.
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    pub turn: Duration,
    pub warning: Duration,
}

impl From<&crate::config::Config> for TimerConfig {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            turn: config.turn_timeout(),
            warning: config.turn_warning(),
        }
    }
}

/// Absolute deadline of the current round.
/// Remaining time is always recomputed from the deadline,
/// so repeated wake/sleep cycles never accumulate drift.
#[derive(Debug)]
pub struct Timer {
    config: TimerConfig,
    deadline: Instant,
}

impl Timer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            deadline: Instant::now() + config.turn,
        }
    }
    /// Restart the round from now.
    pub fn reset(&mut self) {
        self.deadline = Instant::now() + self.config.turn;
    }
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
    pub fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
    /// Inside the warning window at the end of the round.
    pub fn warning(&self) -> bool {
        self.remaining() <= self.config.warning
    }
}
