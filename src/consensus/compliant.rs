use std::{collections::HashSet, sync::Arc};

use tracing::trace;

use super::{
    message::{Candidate, Transaction},
    node::Node,
    peers::Blacklist,
};

/*
    Honest gossip node.

    Every round the node rebroadcasts its pending batch and absorbs the
    transactions its followees sent, unless the sender is blacklisted. A
    followee that sends nothing in a round is blacklisted for good. The node
    stops absorbing input once it reaches round `num_rounds - 1`, so the
    final call to `send_to_followers` returns a stable consensus set.
*/

pub struct CompliantNode {
    num_rounds: usize,
    current_round: usize,
    old_round: usize,
    followees: Arc<[bool]>,
    blacklist: Blacklist,
    pending_trans: HashSet<Transaction>,
    consensus_trans: HashSet<Transaction>,
}

impl CompliantNode {
    pub fn new(num_rounds: usize) -> Self {
        CompliantNode {
            num_rounds,
            current_round: 0,
            old_round: 0,
            followees: Arc::from(Vec::new()),
            blacklist: Blacklist::default(),
            pending_trans: HashSet::new(),
            consensus_trans: HashSet::new(),
        }
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn followees(&self) -> &[bool] {
        &self.followees
    }

    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    pub fn pending(&self) -> &HashSet<Transaction> {
        &self.pending_trans
    }

    pub fn consensus(&self) -> &HashSet<Transaction> {
        &self.consensus_trans
    }

    fn is_frozen(&self) -> bool {
        self.current_round >= self.num_rounds.saturating_sub(1)
    }

    // A followee that sent nothing this round is presumed dead or malicious.
    fn check_malicious(&mut self, candidates: &HashSet<Candidate>) {
        let senders: HashSet<usize> = candidates.iter().map(|c| c.sender).collect();
        for (i, follows) in self.followees.iter().enumerate() {
            if *follows && !senders.contains(&i) && self.blacklist.mark(i) {
                trace!(peer = i, round = self.current_round, "Blacklisted silent followee");
            }
        }
    }
}

impl Node for CompliantNode {
    fn set_followees(&mut self, followees: Arc<[bool]>) {
        self.blacklist = Blacklist::new(followees.len());
        self.followees = followees;
    }

    fn set_pending_transaction(&mut self, pending: HashSet<Transaction>) {
        self.consensus_trans = pending.clone();
        self.pending_trans = pending;
    }

    fn send_to_followers(&mut self) -> HashSet<Transaction> {
        if self.current_round == self.num_rounds {
            self.consensus_trans.clone()
        } else if self.current_round < self.num_rounds {
            self.old_round = self.current_round;
            self.pending_trans.clone()
        } else {
            HashSet::new()
        }
    }

    fn receive_from_followees(&mut self, candidates: &HashSet<Candidate>) {
        self.current_round += 1;
        if self.is_frozen() {
            return;
        }

        if self.old_round > 0 && self.current_round > self.old_round {
            self.pending_trans.clear();
        }

        self.check_malicious(candidates);

        for candidate in candidates {
            if self.blacklist.contains(candidate.sender) {
                continue;
            }
            if self.consensus_trans.insert(candidate.tx) {
                self.pending_trans.insert(candidate.tx);
                trace!(tx = candidate.tx.id(), sender = candidate.sender, "Accepted transaction");
            }
        }
    }

    fn is_blacklisted(&self, peer: usize) -> bool {
        self.blacklist.contains(peer)
    }
}
