use super::*;
use crate::PlayerId;
use crate::Score;
use crate::cards::Deck;
use crate::cards::MatchOracle;
use crate::config::Config;
use crate::config::ConfigError;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Final standings of a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub rounds: u64,
    pub scores: Vec<Score>,
    pub winners: Vec<PlayerId>,
}

/// Sole owner of the round lifecycle.
///
/// Deals cards, runs the round countdown, arbitrates claims one at a time,
/// applies scores and freezes, resets the table between rounds, and declares
/// the winners. Deck, scores, freezes and the round deadline live here and
/// nowhere else; players see them only through verdicts, [`Frost`] views and
/// sink events.
///
/// Dealer runs rounds until cancelled or until the deck holds no match:
/// - Dealing: fill empty slots from the front of the deck
/// - Playing: wake on tick or claim, refresh displays, thaw, arbitrate, top up
/// - Clearing: stale every pending claim, return the table to the deck, shuffle
pub struct Dealer {
    round: u64,
    config: Config,
    deck: Deck,
    timer: Timer,
    table: Arc<Table>,
    scores: Vec<Score>,
    freezes: Freezes,
    arbiter: Arbiter,
    oracle: Arc<dyn MatchOracle>,
    sink: Arc<dyn Sink>,
    token: CancellationToken,
    rng: SmallRng,
    players: Vec<JoinHandle<Vec<Verdict>>>,
}

impl Dealer {
    /// Validates the configuration before anything runs.
    pub fn new(
        config: Config,
        oracle: Arc<dyn MatchOracle>,
        sink: Arc<dyn Sink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = SmallRng::from_rng(&mut rand::rng());
        let mut deck = Deck::new(config.deck_size);
        deck.shuffle(&mut rng);
        Ok(Self {
            round: 0,
            deck,
            timer: Timer::new(TimerConfig::from(&config)),
            table: Arc::new(Table::new(config.table_size)),
            scores: vec![0; config.players],
            freezes: Freezes::new(config.players),
            arbiter: Arbiter::new(config.players),
            oracle,
            sink,
            token: CancellationToken::new(),
            rng,
            players: Vec::new(),
            config,
        })
    }
    /// Deal from this deck, in this order, instead of a shuffled one.
    /// The deck must hold every configured card exactly once.
    pub fn with_deck(mut self, deck: Deck) -> Result<Self, ConfigError> {
        let mut cards = deck.cards().to_vec();
        cards.sort_unstable();
        if !cards.iter().copied().eq(Deck::new(self.config.deck_size)) {
            return Err(ConfigError::DeckMismatch {
                expected: self.config.deck_size,
            });
        }
        self.deck = deck;
        Ok(self)
    }
    /// Seed the shuffles between rounds.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Spawns an actor for the next empty seat.
    /// `None` once every configured seat is taken.
    pub fn sit(&mut self) -> Option<PlayerHandle> {
        let id = self.players.len();
        let frost = self.freezes.watch(id)?;
        let (handle, task) = Actor::spawn(
            id,
            self.table.clone(),
            frost,
            self.arbiter.submitter(),
            self.sink.clone(),
            self.token.clone(),
        );
        self.players.push(task);
        log::debug!("[dealer] P{} sat down", id);
        Some(handle)
    }
    /// Fills every remaining seat.
    pub fn seat(&mut self) -> Vec<PlayerHandle> {
        std::iter::from_fn(|| self.sit()).collect()
    }
    /// Cancelling this token ends the game at the next suspension point.
    pub fn terminator(&self) -> CancellationToken {
        self.token.clone()
    }
    pub fn table(&self) -> Arc<Table> {
        self.table.clone()
    }
    pub fn deck(&self) -> &Deck {
        &self.deck
    }
    pub fn scores(&self) -> &[Score] {
        &self.scores
    }
}

impl Dealer {
    pub async fn run(mut self) -> Outcome {
        log::info!(
            "[dealer] starting with {} players and {} cards",
            self.config.players,
            self.deck.len()
        );
        while !self.should_finish() {
            self.round += 1;
            self.deal();
            self.table.open();
            self.timer.reset();
            self.countdown();
            log::info!(
                "[dealer] round {} dealt, {} cards left in deck",
                self.round,
                self.deck.len()
            );
            self.play().await;
            self.countdown();
            self.clear();
        }
        self.conclude().await
    }

    fn should_finish(&self) -> bool {
        self.token.is_cancelled() || !self.oracle.any_match(self.deck.cards())
    }

    async fn play(&mut self) {
        while !self.token.is_cancelled() && !self.timer.expired() {
            let claim = self.sleep().await;
            self.countdown();
            self.thaw();
            if let Some(claim) = claim {
                self.arbitrate(claim);
            }
            self.deal();
        }
    }

    /// Wakes on the earliest of cancellation, a pending claim,
    /// the next display tick, or the round deadline.
    async fn sleep(&mut self) -> Option<Claim> {
        let interval = if self.timer.warning() {
            self.config.warning_tick()
        } else {
            self.config.tick()
        };
        let wake = (Instant::now() + interval).min(self.timer.deadline());
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            claim = self.arbiter.next() => claim,
            _ = tokio::time::sleep_until(wake) => None,
        }
    }
}

impl Dealer {
    /// Move cards from the deck into empty slots until either runs out.
    fn deal(&mut self) {
        for slot in self.table.empty_slots() {
            match self.deck.draw() {
                Some(card) => {
                    self.table.place(card, slot);
                    self.sink.report(Event::Placed { card, slot });
                }
                None => break,
            }
        }
    }

    /// Rule on one claim against the table as it stands now.
    fn arbitrate(&mut self, claim: Claim) {
        let player = claim.player();
        let slots = claim.slots();
        let verdict = match self.table.claimed(player, slots) {
            None => {
                log::debug!("[dealer] P{} claim on {:?} went stale", player, slots);
                Verdict::Stale
            }
            Some(cards) if self.oracle.is_match(&cards) => {
                log::debug!("[dealer] P{} found match {:?}", player, cards);
                for slot in slots {
                    self.table.remove(slot);
                    self.sink.report(Event::Removed { slot });
                }
                if let Some(score) = self.scores.get_mut(player) {
                    *score += 1;
                    let score = *score;
                    self.sink.report(Event::Score { player, score });
                }
                self.freeze(player, self.config.point_freeze());
                if self.config.reset_on_match {
                    self.timer.reset();
                    self.countdown();
                }
                Verdict::Scored
            }
            Some(cards) => {
                log::debug!("[dealer] P{} claimed non-match {:?}", player, cards);
                self.freeze(player, self.config.penalty_freeze());
                Verdict::Penalized
            }
        };
        claim.resolve(verdict);
    }

    /// Return every table card to the deck and shuffle.
    /// Claims still queued can only refer to the old table.
    fn clear(&mut self) {
        self.table.close();
        self.stale();
        let cards = self.table.clear();
        for &(slot, _) in cards.iter() {
            self.sink.report(Event::Removed { slot });
        }
        self.deck.restore(cards.into_iter().map(|(_, card)| card));
        self.deck.shuffle(&mut self.rng);
        log::debug!("[dealer] round {} cleared", self.round);
    }

    fn stale(&mut self) {
        for claim in self.arbiter.drain() {
            log::debug!("[dealer] P{} claim dropped with the table", claim.player());
            claim.resolve(Verdict::Stale);
        }
    }

    /// Announce winners, stop every player, and wait for them to leave.
    async fn conclude(mut self) -> Outcome {
        let top = self.scores.iter().copied().max().unwrap_or(0);
        let winners = self
            .scores
            .iter()
            .enumerate()
            .filter(|(_, score)| **score == top)
            .map(|(player, _)| player)
            .collect::<Vec<PlayerId>>();
        log::info!("[dealer] game over after {} rounds, winners {:?}", self.round, winners);
        self.sink.report(Event::GameOver {
            winners: winners.clone(),
        });
        self.token.cancel();
        self.stale();
        for (id, task) in self.players.drain(..).enumerate() {
            match task.await {
                Ok(verdicts) => log::debug!("[dealer] P{} left after {} claims", id, verdicts.len()),
                Err(e) => log::warn!("[dealer] P{} did not exit cleanly: {}", id, e),
            }
        }
        Outcome {
            rounds: self.round,
            scores: self.scores,
            winners,
        }
    }
}

impl Dealer {
    fn freeze(&self, player: PlayerId, duration: std::time::Duration) {
        self.freezes.freeze(player, Instant::now() + duration);
        self.sink.report(Event::Freeze {
            player,
            remaining: duration,
        });
    }

    /// Single check-and-clear of elapsed freezes, then a display refresh.
    fn thaw(&self) {
        let now = Instant::now();
        for player in self.freezes.expire(now) {
            log::debug!("[dealer] P{} thawed", player);
        }
        for player in 0..self.freezes.players() {
            self.sink.report(Event::Freeze {
                player,
                remaining: self.freezes.remaining(player, now),
            });
        }
    }

    fn countdown(&self) {
        self.sink.report(Event::Countdown {
            remaining: self.timer.remaining(),
            warning: self.timer.warning(),
        });
    }
}
