use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use super::{
    config::SimulationConfig,
    report::{DetectionStats, SimulationReport},
};
use crate::{
    consensus::{
        compliant::CompliantNode,
        malicious::MaliciousNode,
        message::Transaction,
        node::{NodeSlot, Role},
        processor::NodeHandle,
    },
    error::{ConfigError, SimulationError},
    network::{graph::FollowGraph, router::route},
};

/// A fully set up run: nodes with their followees and initial pending sets
/// installed, waiting for the round loop.
pub struct Simulation {
    slots: Vec<NodeSlot>,
    graph: FollowGraph,
    num_rounds: usize,
    num_tx: u64,
    possible_consensus: HashSet<Transaction>,
}

/// The report plus the nodes in their final state.
#[derive(Debug)]
pub struct SimulationOutcome {
    pub report: SimulationReport,
    pub nodes: Vec<NodeSlot>,
}

impl Simulation {
    /// Draws roles, the follow-graph and initial pending sets from a
    /// ChaCha8 stream seeded with `config.seed`, in that order.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let slots: Vec<NodeSlot> = (0..config.num_nodes)
            .map(|i| {
                if rng.gen::<f64>() < config.p_malicious {
                    // Strategies get their own stream so they never shift the setup draws.
                    let seed = config.seed.wrapping_add(i as u64 + 1);
                    NodeSlot::malicious(MaliciousNode::new(config.strategy, config.num_tx, seed))
                } else {
                    NodeSlot::compliant(CompliantNode::new(config.num_rounds))
                }
            })
            .collect();

        let graph = FollowGraph::random(config.num_nodes, config.p_graph, &mut rng);

        let pending: Vec<HashSet<Transaction>> = (0..config.num_nodes)
            .map(|_| {
                (0..config.num_tx)
                    .filter(|_| rng.gen::<f64>() < config.p_tx_distribution)
                    .map(Transaction::new)
                    .collect()
            })
            .collect();

        let simulation = Self::from_parts(slots, graph, pending, config.num_rounds, config.num_tx)?;
        info!(
            num_nodes = config.num_nodes,
            malicious = simulation.malicious_count(),
            edges = simulation.graph.edge_count(),
            num_rounds = config.num_rounds,
            seed = config.seed,
            strategy = %config.strategy,
            "Simulation created"
        );
        Ok(simulation)
    }

    /// Builds a run from explicit nodes, graph and initial pending sets.
    pub fn from_parts(
        mut slots: Vec<NodeSlot>,
        graph: FollowGraph,
        pending: Vec<HashSet<Transaction>>,
        num_rounds: usize,
        num_tx: u64,
    ) -> Result<Self, ConfigError> {
        if slots.is_empty() {
            return Err(ConfigError::NoNodes);
        }
        if num_tx == 0 {
            return Err(ConfigError::EmptyUniverse);
        }
        if graph.num_nodes() != slots.len() {
            return Err(ConfigError::GraphShape {
                expected: slots.len(),
                found: graph.num_nodes(),
            });
        }
        if pending.len() != slots.len() {
            return Err(ConfigError::PendingSetCount {
                expected: slots.len(),
                found: pending.len(),
            });
        }

        let mut possible_consensus = HashSet::new();
        for (i, (slot, txs)) in slots.iter_mut().zip(pending).enumerate() {
            slot.node.set_followees(graph.followees(i));
            if slot.role.is_compliant() {
                possible_consensus.extend(txs.iter().copied());
            }
            slot.node.set_pending_transaction(txs);
        }

        Ok(Simulation {
            slots,
            graph,
            num_rounds,
            num_tx,
            possible_consensus,
        })
    }

    pub fn graph(&self) -> &FollowGraph {
        &self.graph
    }

    pub fn roles(&self) -> Vec<Role> {
        self.slots.iter().map(|slot| slot.role).collect()
    }

    pub fn malicious_count(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.role.is_compliant()).count()
    }

    pub fn possible_consensus(&self) -> &HashSet<Transaction> {
        &self.possible_consensus
    }

    /// Runs `num_rounds` rounds, then collects every compliant node's final
    /// broadcast.
    ///
    /// Within a round all nodes propose before any node receives, and every
    /// delivery is acknowledged before the next round starts.
    pub async fn run(self) -> Result<SimulationOutcome, SimulationError> {
        let Simulation {
            slots,
            graph,
            num_rounds,
            num_tx,
            possible_consensus,
        } = self;

        let handles: Vec<NodeHandle> = slots
            .into_iter()
            .enumerate()
            .map(|(id, slot)| NodeHandle::spawn(id, slot))
            .collect();

        for round in 1..=num_rounds {
            let proposals = propose_all(&handles).await?;
            let inboxes = route(&graph, &proposals, num_tx);

            let mut acks = Vec::new();
            let mut candidates = 0;
            for (handle, inbox) in handles.iter().zip(inboxes) {
                if inbox.is_empty() {
                    continue;
                }
                candidates += inbox.len();
                acks.push((handle.id, handle.deliver(inbox).await?));
            }
            let receivers = acks.len();
            for (id, ack) in acks {
                ack.await.map_err(|_| SimulationError::NodeUnavailable(id))?;
            }
            debug!(round, receivers, candidates, "Round complete");
        }

        let mut finals = Vec::new();
        for handle in handles.iter().filter(|h| h.role.is_compliant()) {
            let reply = handle.propose().await?;
            let txs = reply.await.map_err(|_| SimulationError::NodeUnavailable(handle.id))?;
            finals.push((handle.id, txs));
        }

        let mut nodes = Vec::with_capacity(handles.len());
        for handle in handles {
            nodes.push(handle.shutdown().await?);
        }

        let detection = DetectionStats::collect(&graph, &nodes);
        let report = SimulationReport::build(finals, possible_consensus.len(), detection);
        info!(
            groups = report.groups.len(),
            compliant = report.compliant_count,
            agreement = report.agreement_ratio(),
            "Simulation finished"
        );

        Ok(SimulationOutcome { report, nodes })
    }
}

/// Asks every node for its proposal and waits for all of them.
async fn propose_all(handles: &[NodeHandle]) -> Result<Vec<HashSet<Transaction>>, SimulationError> {
    let mut replies = Vec::with_capacity(handles.len());
    for handle in handles {
        replies.push((handle.id, handle.propose().await?));
    }

    let mut proposals = Vec::with_capacity(handles.len());
    for (id, reply) in replies {
        proposals.push(reply.await.map_err(|_| SimulationError::NodeUnavailable(id))?);
    }
    Ok(proposals)
}
