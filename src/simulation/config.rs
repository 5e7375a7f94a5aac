use crate::{consensus::malicious::Strategy, error::ConfigError};

/// Size of the transaction universe when none is given.
pub const DEFAULT_NUM_TX: u64 = 500;

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub num_nodes: usize,
    /// Probability of each directed edge of the follow-graph.
    pub p_graph: f64,
    /// Probability that a node is malicious.
    pub p_malicious: f64,
    /// Probability that a transaction is in a node's initial pending set.
    pub p_tx_distribution: f64,
    pub num_rounds: usize,
    pub num_tx: u64,
    pub seed: u64,
    pub strategy: Strategy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_nodes: 100,
            p_graph: 0.1,
            p_malicious: 0.3,
            p_tx_distribution: 0.01,
            num_rounds: 10,
            num_tx: DEFAULT_NUM_TX,
            seed: DEFAULT_SEED,
            strategy: Strategy::default(),
        }
    }
}

impl SimulationConfig {
    pub fn new(num_nodes: usize, p_graph: f64, p_malicious: f64, p_tx_distribution: f64, num_rounds: usize) -> Self {
        SimulationConfig {
            num_nodes,
            p_graph,
            p_malicious,
            p_tx_distribution,
            num_rounds,
            ..Default::default()
        }
    }

    pub fn with_num_tx(mut self, num_tx: u64) -> Self {
        self.num_tx = num_tx;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_nodes == 0 {
            return Err(ConfigError::NoNodes);
        }
        check_probability("p_graph", self.p_graph)?;
        check_probability("p_malicious", self.p_malicious)?;
        check_probability("p_tx_distribution", self.p_tx_distribution)?;
        if self.num_tx == 0 {
            return Err(ConfigError::EmptyUniverse);
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    // NaN fails the range check too.
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.num_tx, 500);
    }

    #[test]
    fn test_rejects_out_of_range_probabilities() {
        let config = SimulationConfig::new(10, 1.5, 0.1, 0.1, 5);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidProbability { name: "p_graph", value: 1.5 })
        );

        let config = SimulationConfig::new(10, 0.1, -0.1, 0.1, 5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability { name: "p_malicious", .. })
        ));

        let config = SimulationConfig::new(10, 0.1, 0.1, f64::NAN, 5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability { name: "p_tx_distribution", .. })
        ));
    }

    #[test]
    fn test_rejects_empty_populations() {
        assert_eq!(SimulationConfig::new(0, 0.1, 0.1, 0.1, 5).validate(), Err(ConfigError::NoNodes));
        assert_eq!(
            SimulationConfig::default().with_num_tx(0).validate(),
            Err(ConfigError::EmptyUniverse)
        );
    }

    #[test]
    fn test_zero_rounds_is_valid() {
        assert_eq!(SimulationConfig::new(3, 0.5, 0.0, 0.5, 0).validate(), Ok(()));
    }
}
