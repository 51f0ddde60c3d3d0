use crate::Slot;
use crate::gameroom::PlayerHandle;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Simulated player that mashes random slots at a fixed pace.
/// Presses land on the player's input queue exactly like a keyboard's,
/// so a full queue or a frozen player simply swallows them.
pub struct Bot {
    handle: PlayerHandle,
    slots: usize,
    delay: Duration,
    rng: SmallRng,
}

impl Bot {
    pub fn new(handle: PlayerHandle, slots: usize, delay: Duration) -> Self {
        Self {
            handle,
            slots,
            delay,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    fn pick(&mut self) -> Slot {
        self.rng.random_range(0..self.slots.max(1))
    }

    /// Presses until cancelled or the player leaves.
    /// Returns how many presses the player accepted.
    pub fn spawn(mut self, token: CancellationToken) -> JoinHandle<usize> {
        tokio::spawn(async move {
            let mut accepted = 0;
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(self.delay) => {
                        let slot = self.pick();
                        if self.handle.press(slot) {
                            accepted += 1;
                        } else if self.handle.is_closed() {
                            break;
                        }
                    }
                }
            }
            log::debug!("[bot P{}] stopped after {} presses", self.handle.id(), accepted);
            accepted
        })
    }
}
