use std::{collections::HashSet, fmt, sync::Arc};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{
    message::{Candidate, Transaction},
    node::Node,
};

/// Number of ids a flooding node adds to every broadcast.
pub const FLOOD_BATCH: usize = 32;

/// Adversarial behaviours available to the simulation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, clap::ValueEnum)]
pub enum Strategy {
    /// Never broadcasts anything.
    #[default]
    Silent,
    /// Broadcasts its initial set plus random ids, half of them invalid.
    Flood,
    /// Rebroadcasts its initial set every round.
    Replay,
    /// Rebroadcasts its initial set on even rounds only.
    Sporadic,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Silent => write!(f, "silent"),
            Strategy::Flood => write!(f, "flood"),
            Strategy::Replay => write!(f, "replay"),
            Strategy::Sporadic => write!(f, "sporadic"),
        }
    }
}

pub struct MaliciousNode {
    strategy: Strategy,
    num_tx: u64,
    round: usize,
    initial: HashSet<Transaction>,
    rng: ChaCha8Rng,
}

impl MaliciousNode {
    /// `num_tx` is the size of the valid id universe, used by `Flood` to
    /// mix valid and out of range ids.
    pub fn new(strategy: Strategy, num_tx: u64, seed: u64) -> Self {
        MaliciousNode {
            strategy,
            num_tx,
            round: 0,
            initial: HashSet::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    fn flood(&mut self) -> HashSet<Transaction> {
        let mut txs = self.initial.clone();
        let upper = self.num_tx.max(1);
        for i in 0..FLOOD_BATCH {
            let id = if i % 2 == 0 {
                self.rng.gen_range(0..upper)
            } else {
                upper.saturating_add(self.rng.gen_range(0..upper))
            };
            txs.insert(Transaction::new(id));
        }
        txs
    }
}

impl Node for MaliciousNode {
    fn set_followees(&mut self, _followees: Arc<[bool]>) {}

    fn set_pending_transaction(&mut self, pending: HashSet<Transaction>) {
        self.initial = pending;
    }

    fn send_to_followers(&mut self) -> HashSet<Transaction> {
        let round = self.round;
        self.round += 1;
        match self.strategy {
            Strategy::Silent => HashSet::new(),
            Strategy::Flood => self.flood(),
            Strategy::Replay => self.initial.clone(),
            Strategy::Sporadic if round % 2 == 0 => self.initial.clone(),
            Strategy::Sporadic => HashSet::new(),
        }
    }

    fn receive_from_followees(&mut self, _candidates: &HashSet<Candidate>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_initial(strategy: Strategy, ids: &[u64]) -> MaliciousNode {
        let mut node = MaliciousNode::new(strategy, 100, 7);
        node.set_pending_transaction(ids.iter().map(|id| Transaction::new(*id)).collect());
        node
    }

    #[test]
    fn test_silent_never_sends() {
        let mut node = with_initial(Strategy::Silent, &[1, 2]);
        for _ in 0..4 {
            assert!(node.send_to_followers().is_empty());
        }
    }

    #[test]
    fn test_sporadic_alternates() {
        let mut node = with_initial(Strategy::Sporadic, &[1]);
        assert_eq!(node.send_to_followers().len(), 1);
        assert!(node.send_to_followers().is_empty());
        assert_eq!(node.send_to_followers().len(), 1);
    }

    #[test]
    fn test_flood_mixes_invalid_ids() {
        let mut node = with_initial(Strategy::Flood, &[1]);
        let sent = node.send_to_followers();

        assert!(sent.contains(&Transaction::new(1)));
        assert!(sent.iter().any(|tx| tx.id() >= 100));
        assert!(sent.iter().any(|tx| tx.id() < 100 && tx.id() != 1));
    }

    #[test]
    fn test_flood_is_seeded() {
        let mut a = with_initial(Strategy::Flood, &[]);
        let mut b = with_initial(Strategy::Flood, &[]);
        assert_eq!(a.send_to_followers(), b.send_to_followers());
    }
}
