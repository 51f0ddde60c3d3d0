use super::*;
use crate::INPUT_QUEUE;
use crate::PlayerId;
use crate::Slot;
use std::sync::Arc;
use tokio::sync::mpsc::*;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Where a player stands between keypresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No markers on the table.
    Idle,
    /// One or two markers on the table.
    Placing,
    /// Claim submitted, suspended until the dealer rules on it.
    AwaitingVerdict,
}

/// Input side of a seated player. Cloneable so a keyboard, a bot,
/// or a test can all drive the same player.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    id: PlayerId,
    input: Sender<Slot>,
}

impl PlayerHandle {
    pub fn new(id: PlayerId, input: Sender<Slot>) -> Self {
        Self { id, input }
    }
    pub fn id(&self) -> PlayerId {
        self.id
    }
    /// Queue a slot selection. Never blocks: returns false when the
    /// player's input queue is full or the player has left.
    pub fn press(&self, slot: Slot) -> bool {
        self.input.try_send(slot).is_ok()
    }
    /// True once the player has left the game.
    pub fn is_closed(&self) -> bool {
        self.input.is_closed()
    }
}

/// Runs one player in its own task.
///
/// - Keypresses toggle markers on the shared table
/// - The third marker captures a claim and hands it to the dealer
/// - The actor then suspends until the verdict arrives
/// - While frozen, keypresses are read and thrown away
///
/// The actor never touches the table on a verdict: the dealer has already
/// removed cards, scored, and frozen by the time the verdict lands.
pub struct Actor {
    id: PlayerId,
    phase: Phase,
    table: Arc<Table>,
    frost: Frost,
    claims: Submitter,
    sink: Arc<dyn Sink>,
    token: CancellationToken,
    inputs: Receiver<Slot>,
    verdicts: Vec<Verdict>,
}

impl Actor {
    pub fn spawn(
        id: PlayerId,
        table: Arc<Table>,
        frost: Frost,
        claims: Submitter,
        sink: Arc<dyn Sink>,
        token: CancellationToken,
    ) -> (PlayerHandle, JoinHandle<Vec<Verdict>>) {
        let (tx, rx) = channel(INPUT_QUEUE);
        let actor = Self {
            id,
            phase: Phase::Idle,
            table,
            frost,
            claims,
            sink,
            token,
            inputs: rx,
            verdicts: Vec::new(),
        };
        let handle = tokio::spawn(actor.run());
        (PlayerHandle::new(id, tx), handle)
    }

    /// Returns every verdict this player received, in order.
    async fn run(mut self) -> Vec<Verdict> {
        log::debug!("[player P{}] starting", self.id);
        loop {
            if self.token.is_cancelled() {
                break;
            }
            tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                input = self.inputs.recv() => match input {
                    Some(slot) => {
                        if !self.press(slot).await {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
        log::debug!(
            "[player P{}] terminated {:?} after {} claims",
            self.id,
            self.phase,
            self.verdicts.len()
        );
        self.verdicts
    }

    /// Returns false if the game ended while this press was in flight.
    async fn press(&mut self, slot: Slot) -> bool {
        if self.frost.is_frozen() {
            log::trace!(
                "[player P{}] frozen for {:?}, ignoring slot {}",
                self.id,
                self.frost.remaining(),
                slot
            );
            return true;
        }
        match self.table.toggle(self.id, slot) {
            Toggle::Rejected => {
                log::trace!("[player P{}] slot {} rejected", self.id, slot);
                true
            }
            Toggle::Removed(n) => {
                self.phase = if n == 0 { Phase::Idle } else { Phase::Placing };
                self.sink.report(Event::Unmarked {
                    player: self.id,
                    slot,
                });
                true
            }
            Toggle::Placed(_) => {
                self.phase = Phase::Placing;
                self.sink.report(Event::Marked {
                    player: self.id,
                    slot,
                });
                true
            }
            Toggle::Completed(slots) => {
                self.sink.report(Event::Marked {
                    player: self.id,
                    slot,
                });
                self.claim(slots).await
            }
        }
    }

    async fn claim(&mut self, slots: [Slot; crate::MATCH_SIZE]) -> bool {
        let (claim, reply) = Claim::new(self.id, slots);
        self.phase = Phase::AwaitingVerdict;
        log::debug!("[player P{}] claims {:?}", self.id, slots);
        tokio::select! {
            biased;
            _ = self.token.cancelled() => return false,
            sent = self.claims.submit(claim) => if sent.is_err() {
                return false;
            },
        }
        let verdict = tokio::select! {
            biased;
            _ = self.token.cancelled() => return false,
            verdict = reply => match verdict {
                Ok(verdict) => verdict,
                Err(_) => return false,
            },
        };
        self.settle(verdict);
        true
    }

    fn settle(&mut self, verdict: Verdict) {
        log::debug!("[player P{}] {}", self.id, verdict);
        self.verdicts.push(verdict);
        let discarded = std::iter::from_fn(|| self.inputs.try_recv().ok()).count();
        if discarded > 0 {
            log::trace!("[player P{}] dropped {} queued presses", self.id, discarded);
        }
        self.phase = match self.table.markers_of(self.id).len() {
            0 => Phase::Idle,
            _ => Phase::Placing,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::time::Duration;
    use tokio::time::Instant;
    use tokio::time::sleep;

    struct Rig {
        table: Arc<Table>,
        freezes: Freezes,
        arbiter: Arbiter,
        token: CancellationToken,
        events: UnboundedReceiver<Event>,
    }

    fn rig() -> (Rig, PlayerHandle, JoinHandle<Vec<Verdict>>) {
        let table = Arc::new(Table::new(6));
        (0..6).for_each(|slot| table.place(slot as crate::Card + 10, slot));
        table.open();
        let freezes = Freezes::new(1);
        let arbiter = Arbiter::new(1);
        let token = CancellationToken::new();
        let (tx, events) = unbounded_channel();
        let (handle, task) = Actor::spawn(
            0,
            table.clone(),
            freezes.watch(0).expect("seat"),
            arbiter.submitter(),
            Arc::new(tx),
            token.clone(),
        );
        let rig = Rig {
            table,
            freezes,
            arbiter,
            token,
            events,
        };
        (rig, handle, task)
    }

    async fn settle() {
        sleep(Duration::from_millis(5)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn presses_toggle_markers() {
        let (mut rig, handle, _task) = rig();
        assert!(handle.press(1));
        assert!(handle.press(4));
        settle().await;
        assert_eq!(rig.table.markers_of(0), BTreeSet::from([1, 4]));
        assert!(handle.press(1));
        settle().await;
        assert_eq!(rig.table.markers_of(0), BTreeSet::from([4]));
        assert_eq!(rig.events.try_recv().ok(), Some(Event::Marked { player: 0, slot: 1 }));
        assert_eq!(rig.events.try_recv().ok(), Some(Event::Marked { player: 0, slot: 4 }));
        assert_eq!(rig.events.try_recv().ok(), Some(Event::Unmarked { player: 0, slot: 1 }));
    }

    #[tokio::test(start_paused = true)]
    async fn frozen_player_changes_nothing() {
        let (mut rig, handle, _task) = rig();
        rig.freezes.freeze(0, Instant::now() + Duration::from_secs(1));
        for slot in 0..3 {
            handle.press(slot);
        }
        settle().await;
        assert!(rig.table.markers_of(0).is_empty());
        assert!(rig.arbiter.poll().is_none());
        assert!(rig.events.try_recv().is_err());
        rig.freezes.expire(Instant::now() + Duration::from_secs(1));
        handle.press(2);
        settle().await;
        assert_eq!(rig.table.markers_of(0), BTreeSet::from([2]));
    }

    #[tokio::test(start_paused = true)]
    async fn third_marker_submits_and_waits() {
        let (mut rig, handle, task) = rig();
        for slot in [5, 0, 3] {
            handle.press(slot);
        }
        let claim = rig.arbiter.next().await.expect("claim");
        assert_eq!(claim.player(), 0);
        assert_eq!(claim.slots(), [0, 3, 5]);
        // queued while suspended, must not survive the verdict
        handle.press(1);
        settle().await;
        claim.resolve(Verdict::Penalized);
        settle().await;
        assert_eq!(rig.table.markers_of(0), BTreeSet::from([0, 3, 5]));
        rig.token.cancel();
        assert_eq!(task.await.expect("join"), vec![Verdict::Penalized]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_unblocks_waiting_player() {
        let (mut rig, handle, task) = rig();
        for slot in [0, 1, 2] {
            handle.press(slot);
        }
        let _claim = rig.arbiter.next().await.expect("claim");
        rig.token.cancel();
        let verdicts = tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("player exits promptly")
            .expect("join");
        assert!(verdicts.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_unblocks_idle_player() {
        let (rig, handle, task) = rig();
        rig.token.cancel();
        task.await.expect("join");
        assert!(!handle.press(0));
    }
}
