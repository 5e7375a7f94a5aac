use std::hash::{Hash, Hasher};

/*
    Nodes exchange proposals in synchronized rounds. A proposal is a set of
    transactions; when the orchestrator fans a proposal out along an edge of
    the follow-graph it wraps every transaction into a candidate stamped with
    the index of the node that broadcast it. A candidate lives for a single
    round: it is built while routing and consumed by the receiving node.
*/

/// An immutable transaction, identified only by its id.
#[derive(Clone, Copy, Debug)]
pub struct Transaction {
    id: u64,
}

impl Transaction {
    pub fn new(id: u64) -> Self {
        Transaction { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Transaction {}

impl Hash for Transaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A transaction paired with the node index that broadcast it this round.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Candidate {
    pub tx: Transaction,
    pub sender: usize,
}

impl Candidate {
    pub fn new(tx: Transaction, sender: usize) -> Self {
        Candidate { tx, sender }
    }
}
