/*
    Gossip consensus simulator.

    Builds a random follow-graph of compliant and malicious nodes, seeds
    every node with a random share of the transaction universe, runs the
    requested number of gossip rounds and prints the groups of compliant
    nodes that settled on the same transaction set.

    gossip-bft --nodes 100 --p-graph 0.1 --p-malicious 0.3 --p-tx 0.01 --rounds 10
*/

use std::process::ExitCode;

use clap::Parser;
use gossip_bft::{
    common::{short_hex, Hashable},
    simulation::{DEFAULT_NUM_TX, DEFAULT_SEED},
    Simulation, SimulationConfig, Strategy,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Given the same seed, every run produces the same report.
#[derive(Parser, Debug)]
#[command(name = "gossip-bft")]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of nodes
    #[arg(short = 'n', long, default_value = "100")]
    nodes: usize,

    /// Probability of each directed follow edge
    #[arg(long, default_value = "0.1")]
    p_graph: f64,

    /// Probability that a node is malicious
    #[arg(long, default_value = "0.3")]
    p_malicious: f64,

    /// Probability that a transaction is in a node's initial set
    #[arg(long, default_value = "0.01")]
    p_tx: f64,

    /// Number of gossip rounds
    #[arg(short = 'r', long, default_value = "10")]
    rounds: usize,

    /// Size of the transaction universe
    #[arg(long, default_value_t = DEFAULT_NUM_TX)]
    num_tx: u64,

    /// Random seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Behaviour of malicious nodes
    #[arg(long, value_enum, default_value_t = Strategy::Silent)]
    strategy: Strategy,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,gossip_bft=info")),
        )
        .init();

    let args = Args::parse();

    let config = SimulationConfig::new(args.nodes, args.p_graph, args.p_malicious, args.p_tx, args.rounds)
        .with_num_tx(args.num_tx)
        .with_seed(args.seed)
        .with_strategy(args.strategy);

    let simulation = match Simulation::new(config) {
        Ok(simulation) => simulation,
        Err(e) => {
            error!("Failed to set up simulation: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match simulation.run().await {
        Ok(outcome) => {
            println!("{}", outcome.report);
            info!(
                agreement = outcome.report.agreement_ratio(),
                digest = %short_hex(&outcome.report.hash()),
                "Run complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Simulation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
