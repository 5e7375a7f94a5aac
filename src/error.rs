use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Simulation needs at least one node")]
    NoNodes,

    #[error("Probability {name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("Transaction universe must not be empty")]
    EmptyUniverse,

    #[error("Follow graph must be {expected}x{expected}, found a dimension of {found}")]
    GraphShape { expected: usize, found: usize },

    #[error("Node {0} cannot follow itself")]
    SelfLoop(usize),

    #[error("Expected {expected} pending sets, found {found}")]
    PendingSetCount { expected: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("Node {0} is no longer reachable")]
    NodeUnavailable(usize),

    #[error("Node task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}
