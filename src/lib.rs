/*
    Round-based gossip among compliant and malicious nodes.

    Nodes sit on a random directed follow-graph and exchange transaction
    proposals for a fixed number of synchronized rounds. Compliant nodes
    accept what their trusted followees send and permanently blacklist any
    followee that goes silent for a round. After the last round compliant
    nodes are grouped by the transaction set they settled on.
*/

pub mod common;
pub mod consensus;
pub mod error;
pub mod network;
pub mod simulation;

pub use consensus::{Candidate, CompliantNode, MaliciousNode, Node, NodeSlot, Role, Strategy, Transaction};
pub use error::{ConfigError, SimulationError};
pub use network::FollowGraph;
pub use simulation::{Simulation, SimulationConfig, SimulationOutcome, SimulationReport};
