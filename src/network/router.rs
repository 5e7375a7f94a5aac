use std::collections::HashSet;

use tracing::trace;

use super::graph::FollowGraph;
use crate::consensus::message::{Candidate, Transaction};

/// Per-node candidate sets for one round, indexed by receiving node.
pub type Inboxes = Vec<HashSet<Candidate>>;

/// Fans every proposal out to the followers of its sender.
///
/// `proposals[i]` is what node `i` broadcast this round. Transactions with
/// ids outside `0..num_tx` are dropped before routing.
pub fn route(graph: &FollowGraph, proposals: &[HashSet<Transaction>], num_tx: u64) -> Inboxes {
    let mut inboxes: Inboxes = vec![HashSet::new(); graph.num_nodes()];
    for (sender, proposal) in proposals.iter().enumerate() {
        let mut dropped = 0usize;
        for tx in proposal {
            if tx.id() >= num_tx {
                dropped += 1;
                continue;
            }
            for listener in graph.followers(sender) {
                inboxes[listener].insert(Candidate::new(*tx, sender));
            }
        }
        if dropped > 0 {
            trace!(sender, dropped, "Dropped transactions outside the valid universe");
        }
    }
    inboxes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txs(ids: &[u64]) -> HashSet<Transaction> {
        ids.iter().map(|id| Transaction::new(*id)).collect()
    }

    #[test]
    fn test_route_follows_edges() {
        // 1 and 2 listen to 0, 0 listens to 2.
        let graph = FollowGraph::from_rows(vec![
            vec![false, false, true],
            vec![true, false, false],
            vec![true, false, false],
        ])
        .unwrap();
        let proposals = vec![txs(&[1, 2]), txs(&[3]), txs(&[4])];

        let inboxes = route(&graph, &proposals, 10);

        let expected_0: HashSet<Candidate> = [Candidate::new(Transaction::new(4), 2)].into_iter().collect();
        let expected_1: HashSet<Candidate> = [
            Candidate::new(Transaction::new(1), 0),
            Candidate::new(Transaction::new(2), 0),
        ]
        .into_iter()
        .collect();
        assert_eq!(inboxes[0], expected_0);
        assert_eq!(inboxes[1], expected_1);
        assert_eq!(inboxes[2], expected_1);
    }

    #[test]
    fn test_route_drops_unknown_ids() {
        let graph = FollowGraph::fully_connected(2);
        let proposals = vec![txs(&[0, 9, 10, 500]), HashSet::new()];

        let inboxes = route(&graph, &proposals, 10);

        let ids: HashSet<u64> = inboxes[1].iter().map(|c| c.tx.id()).collect();
        assert_eq!(ids, [0, 9].into_iter().collect());
        assert!(inboxes[0].is_empty());
    }
}
