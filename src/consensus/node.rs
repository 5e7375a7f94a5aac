use std::{collections::HashSet, fmt, sync::Arc};

use super::message::{Candidate, Transaction};

/// Capabilities every participant of the gossip protocol exposes.
///
/// The orchestrator drives nodes only through this trait. `set_followees`
/// and `set_pending_transaction` are called once before the first round,
/// after which each round is one `send_to_followers` followed by at most one
/// `receive_from_followees`.
pub trait Node: Send {
    /// Installs who this node listens to. Index `i` is true iff this node
    /// follows node `i`.
    fn set_followees(&mut self, followees: Arc<[bool]>);

    fn set_pending_transaction(&mut self, pending: HashSet<Transaction>);

    /// The set broadcast to followers this round.
    fn send_to_followers(&mut self) -> HashSet<Transaction>;

    /// Candidates routed to this node this round, one per (followee,
    /// transaction) pair actually broadcast.
    fn receive_from_followees(&mut self, candidates: &HashSet<Candidate>);

    /// Whether this node has stopped trusting `peer`.
    fn is_blacklisted(&self, _peer: usize) -> bool {
        false
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Role {
    Compliant,
    Malicious,
}

impl Role {
    pub fn is_compliant(&self) -> bool {
        *self == Role::Compliant
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Compliant => write!(f, "compliant"),
            Role::Malicious => write!(f, "malicious"),
        }
    }
}

/// A node together with the role it was constructed with. Reporting reads
/// the tag, never the concrete type.
pub struct NodeSlot {
    pub role: Role,
    pub node: Box<dyn Node>,
}

impl NodeSlot {
    pub fn new(role: Role, node: Box<dyn Node>) -> Self {
        NodeSlot { role, node }
    }

    pub fn compliant(node: impl Node + 'static) -> Self {
        NodeSlot::new(Role::Compliant, Box::new(node))
    }

    pub fn malicious(node: impl Node + 'static) -> Self {
        NodeSlot::new(Role::Malicious, Box::new(node))
    }
}

impl fmt::Debug for NodeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSlot").field("role", &self.role).finish_non_exhaustive()
    }
}
