use std::{
    collections::{BTreeMap, HashSet},
    fmt,
};

use crate::{
    common::hash::{digest_all, digest_ids, short_hex, Digest, Hashable},
    consensus::{message::Transaction, node::NodeSlot},
    network::graph::FollowGraph,
};

/// Compliant nodes that ended the run with the same transaction set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusGroup {
    pub nodes: Vec<usize>,
    pub tx_ids: Vec<u64>,
    pub digest: Digest,
}

/// How well compliant listeners told silent or hostile followees apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionStats {
    /// (compliant listener, malicious followee) links.
    pub malicious_links: usize,
    /// Of those, links where the followee ended blacklisted.
    pub malicious_flagged: usize,
    /// (compliant listener, compliant followee) links.
    pub honest_links: usize,
    /// Of those, links where the followee ended blacklisted.
    pub honest_flagged: usize,
}

impl DetectionStats {
    pub fn collect(graph: &FollowGraph, slots: &[NodeSlot]) -> Self {
        let mut stats = DetectionStats::default();
        for (listener, slot) in slots.iter().enumerate() {
            if !slot.role.is_compliant() {
                continue;
            }
            for (followee, other) in slots.iter().enumerate() {
                if !graph.follows(listener, followee) {
                    continue;
                }
                let flagged = slot.node.is_blacklisted(followee);
                if other.role.is_compliant() {
                    stats.honest_links += 1;
                    stats.honest_flagged += flagged as usize;
                } else {
                    stats.malicious_links += 1;
                    stats.malicious_flagged += flagged as usize;
                }
            }
        }
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    /// Ordered by size, largest first, ties broken by smallest member.
    pub groups: Vec<ConsensusGroup>,
    pub compliant_count: usize,
    /// Size of the union of all compliant nodes' initial sets.
    pub possible_consensus: usize,
    pub detection: DetectionStats,
}

impl SimulationReport {
    /// Groups compliant nodes by their final transaction set.
    pub fn build(
        finals: impl IntoIterator<Item = (usize, HashSet<Transaction>)>,
        possible_consensus: usize,
        detection: DetectionStats,
    ) -> Self {
        let mut by_set: BTreeMap<Vec<u64>, Vec<usize>> = BTreeMap::new();
        let mut compliant_count = 0;
        for (node, txs) in finals {
            let mut ids: Vec<u64> = txs.iter().map(Transaction::id).collect();
            ids.sort_unstable();
            by_set.entry(ids).or_default().push(node);
            compliant_count += 1;
        }

        let mut groups: Vec<ConsensusGroup> = by_set
            .into_iter()
            .map(|(tx_ids, mut nodes)| {
                nodes.sort_unstable();
                ConsensusGroup {
                    digest: digest_ids(&tx_ids),
                    nodes,
                    tx_ids,
                }
            })
            .collect();
        groups.sort_by(|a, b| b.nodes.len().cmp(&a.nodes.len()).then(a.nodes[0].cmp(&b.nodes[0])));

        SimulationReport {
            groups,
            compliant_count,
            possible_consensus,
            detection,
        }
    }

    pub fn largest_group(&self) -> Option<&ConsensusGroup> {
        self.groups.first()
    }

    /// Share of compliant nodes in the largest group, 0 without compliant nodes.
    pub fn agreement_ratio(&self) -> f64 {
        match self.largest_group() {
            Some(group) => group.nodes.len() as f64 / self.compliant_count as f64,
            None => 0.0,
        }
    }

    pub fn is_unanimous(&self) -> bool {
        self.groups.len() == 1
    }
}

/// Fingerprint over every group, in report order.
impl Hashable for SimulationReport {
    fn hash(&self) -> Digest {
        digest_all(self.groups.iter().map(|g| &g.digest))
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.groups {
            writeln!(f, "Node group: {}/{}", group.nodes.len(), self.compliant_count)?;
            writeln!(f, "{:?}", group.nodes)?;
            writeln!(f, "Consensus: {}/{} [{}]", group.tx_ids.len(), self.possible_consensus, short_hex(&group.digest))?;
            writeln!(f, "{:?}", group.tx_ids)?;
            writeln!(f)?;
        }
        writeln!(
            f,
            "Blacklisted malicious followees: {}/{}",
            self.detection.malicious_flagged, self.detection.malicious_links
        )?;
        write!(
            f,
            "Blacklisted compliant followees: {}/{}",
            self.detection.honest_flagged, self.detection.honest_links
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::{
        compliant::CompliantNode,
        malicious::{MaliciousNode, Strategy},
        message::Candidate,
        node::Node,
    };

    fn txs(ids: &[u64]) -> HashSet<Transaction> {
        ids.iter().map(|id| Transaction::new(*id)).collect()
    }

    #[test]
    fn test_groups_identical_sets() {
        let report = SimulationReport::build(
            vec![(0, txs(&[3, 1])), (2, txs(&[9])), (4, txs(&[1, 3])), (5, txs(&[]))],
            4,
            DetectionStats::default(),
        );

        assert_eq!(report.compliant_count, 4);
        assert_eq!(report.groups.len(), 3);
        assert_eq!(report.groups[0].nodes, vec![0, 4]);
        assert_eq!(report.groups[0].tx_ids, vec![1, 3]);
        assert_eq!(report.groups[1].nodes, vec![2]);
        assert_eq!(report.groups[2].nodes, vec![5]);
        assert!(!report.is_unanimous());
        assert_eq!(report.agreement_ratio(), 0.5);
    }

    #[test]
    fn test_empty_report() {
        let report = SimulationReport::build(Vec::new(), 0, DetectionStats::default());
        assert!(report.largest_group().is_none());
        assert_eq!(report.agreement_ratio(), 0.0);
    }

    #[test]
    fn test_digest_tracks_content() {
        let a = SimulationReport::build(vec![(0, txs(&[1]))], 1, DetectionStats::default());
        let b = SimulationReport::build(vec![(0, txs(&[1]))], 1, DetectionStats::default());
        let c = SimulationReport::build(vec![(0, txs(&[2]))], 1, DetectionStats::default());
        assert_eq!(a.hash(), b.hash());
        assert_ne!(a.hash(), c.hash());
    }

    #[test]
    fn test_display_format() {
        let report = SimulationReport::build(vec![(1, txs(&[2, 1]))], 3, DetectionStats::default());
        let text = report.to_string();

        assert!(text.starts_with("Node group: 1/1\n[1]\nConsensus: 2/3 ["));
        assert!(text.contains("[1, 2]"));
        assert!(text.ends_with("Blacklisted compliant followees: 0/0"));
    }

    #[test]
    fn test_detection_stats() {
        let graph = FollowGraph::from_rows(vec![
            vec![false, true, true],
            vec![true, false, true],
            vec![false, false, false],
        ])
        .unwrap();
        let mut slots = vec![
            NodeSlot::compliant(CompliantNode::new(5)),
            NodeSlot::compliant(CompliantNode::new(5)),
            NodeSlot::malicious(MaliciousNode::new(Strategy::Silent, 10, 0)),
        ];
        for (i, slot) in slots.iter_mut().enumerate() {
            slot.node.set_followees(graph.followees(i));
            slot.node.set_pending_transaction(HashSet::new());
        }
        // Node 0 hears only from node 1, node 1 hears nothing.
        let heard: HashSet<Candidate> = [Candidate::new(Transaction::new(1), 1)].into_iter().collect();
        slots[0].node.receive_from_followees(&heard);
        slots[1].node.receive_from_followees(&HashSet::new());

        let stats = DetectionStats::collect(&graph, &slots);
        assert_eq!(
            stats,
            DetectionStats {
                malicious_links: 2,
                malicious_flagged: 2,
                honest_links: 2,
                honest_flagged: 1,
            }
        );
    }
}
