use super::*;
use tokio::sync::mpsc::*;

/// Intake queue of completed claims.
///
/// Many players submit, the dealer alone consumes, in the order submissions
/// completed. Capacity is one claim per player: a player has at most one
/// claim outstanding, so a submission never waits in practice.
///
/// The sender and receiver stay coupled: holding a sender here keeps the
/// channel open for as long as the dealer lives, so waiting on
/// [`Arbiter::next`] can only end with a claim.
#[derive(Debug)]
pub struct Arbiter {
    tx: Sender<Claim>,
    rx: Receiver<Claim>,
}

impl Arbiter {
    pub fn new(players: usize) -> Self {
        let (tx, rx) = channel(players.max(1));
        Self { tx, rx }
    }
    /// Producer handle for one player.
    pub fn submitter(&self) -> Submitter {
        Submitter(self.tx.clone())
    }
    /// Next claim, if one is already pending.
    pub fn poll(&mut self) -> Option<Claim> {
        self.rx.try_recv().ok()
    }
    /// Wait until a claim is pending.
    pub async fn next(&mut self) -> Option<Claim> {
        self.rx.recv().await
    }
    /// Every pending claim, oldest first.
    pub fn drain(&mut self) -> Vec<Claim> {
        std::iter::from_fn(|| self.poll()).collect()
    }
}

/// Player side of the [`Arbiter`].
#[derive(Debug, Clone)]
pub struct Submitter(Sender<Claim>);

impl Submitter {
    /// Hand a claim to the dealer. Gives the claim back if the dealer is gone.
    pub async fn submit(&self, claim: Claim) -> Result<(), Claim> {
        self.0.send(claim).await.map_err(|e| e.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[tokio::test]
    async fn poll_is_non_blocking() {
        let mut arbiter = Arbiter::new(2);
        assert!(arbiter.poll().is_none());
        let (claim, _verdict) = Claim::new(1, [0, 1, 2]);
        arbiter.submitter().submit(claim).await.expect("open");
        assert_eq!(arbiter.poll().map(|c| c.player()), Some(1));
        assert!(arbiter.poll().is_none());
    }
    #[tokio::test]
    async fn fifo_across_producers() {
        let mut arbiter = Arbiter::new(3);
        let (a, b, c) = (arbiter.submitter(), arbiter.submitter(), arbiter.submitter());
        let mut verdicts = Vec::new();
        for (player, submitter) in [(2, &c), (0, &a), (1, &b)] {
            let (claim, verdict) = Claim::new(player, [0, 1, 2]);
            submitter.submit(claim).await.expect("open");
            verdicts.push(verdict);
        }
        let order = arbiter
            .drain()
            .into_iter()
            .map(|c| c.player())
            .collect::<Vec<_>>();
        assert_eq!(order, vec![2, 0, 1]);
    }
    #[tokio::test]
    async fn next_wakes_on_submission() {
        let mut arbiter = Arbiter::new(1);
        let submitter = arbiter.submitter();
        let task = tokio::spawn(async move {
            let (claim, verdict) = Claim::new(0, [3, 4, 5]);
            submitter.submit(claim).await.expect("open");
            verdict.await
        });
        let claim = arbiter.next().await.expect("claim");
        assert_eq!(claim.slots(), [3, 4, 5]);
        claim.resolve(Verdict::Stale);
        assert_eq!(task.await.expect("join"), Ok(Verdict::Stale));
    }
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn one_verdict_per_claim_to_submitter_only() {
        let players = 8;
        let mut arbiter = Arbiter::new(players);
        let tasks = (0..players)
            .map(|player| {
                let submitter = arbiter.submitter();
                tokio::spawn(async move {
                    let (claim, verdict) = Claim::new(player, [player, player + 1, player + 2]);
                    submitter.submit(claim).await.expect("open");
                    (player, verdict.await)
                })
            })
            .collect::<Vec<_>>();
        for _ in 0..players {
            let claim = arbiter.next().await.expect("claim");
            let verdict = match claim.player() % 2 {
                0 => Verdict::Scored,
                _ => Verdict::Penalized,
            };
            claim.resolve(verdict);
        }
        for task in tasks {
            let (player, verdict) = task.await.expect("join");
            let expected = match player % 2 {
                0 => Verdict::Scored,
                _ => Verdict::Penalized,
            };
            assert_eq!(verdict, Ok(expected));
        }
        assert!(arbiter.poll().is_none());
    }
}
