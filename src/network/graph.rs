use std::sync::Arc;

use rand::Rng;

use crate::error::ConfigError;

/// Directed follow relation between nodes. `follows(i, j)` means node `i`
/// listens to node `j`. Rows are shared read-only with the nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowGraph {
    rows: Vec<Arc<[bool]>>,
}

impl FollowGraph {
    /// Every ordered pair `(i, j)` with `i != j` becomes an edge with
    /// probability `p_graph`, drawn row by row.
    pub fn random<R: Rng + ?Sized>(num_nodes: usize, p_graph: f64, rng: &mut R) -> Self {
        let rows: Vec<Arc<[bool]>> = (0..num_nodes)
            .map(|i| {
                Arc::from(
                    (0..num_nodes)
                        .map(|j| i != j && rng.gen::<f64>() < p_graph)
                        .collect::<Vec<bool>>(),
                )
            })
            .collect();
        FollowGraph { rows }
    }

    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, ConfigError> {
        let expected = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(ConfigError::GraphShape {
                    expected,
                    found: row.len(),
                });
            }
            if row[i] {
                return Err(ConfigError::SelfLoop(i));
            }
        }
        Ok(FollowGraph {
            rows: rows.into_iter().map(Arc::from).collect(),
        })
    }

    pub fn empty(num_nodes: usize) -> Self {
        FollowGraph {
            rows: (0..num_nodes).map(|_| Arc::from(vec![false; num_nodes])).collect(),
        }
    }

    pub fn fully_connected(num_nodes: usize) -> Self {
        FollowGraph {
            rows: (0..num_nodes)
                .map(|i| Arc::from((0..num_nodes).map(|j| i != j).collect::<Vec<bool>>()))
                .collect(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.rows.len()
    }

    pub fn follows(&self, listener: usize, followee: usize) -> bool {
        self.rows
            .get(listener)
            .and_then(|row| row.get(followee).copied())
            .unwrap_or(false)
    }

    /// The row handed to `listener` via `set_followees`.
    pub fn followees(&self, listener: usize) -> Arc<[bool]> {
        self.rows[listener].clone()
    }

    /// Nodes listening to `sender`.
    pub fn followers(&self, sender: usize) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(move |(_, row)| row.get(sender).copied().unwrap_or(false))
            .map(|(listener, _)| listener)
    }

    pub fn edge_count(&self) -> usize {
        self.rows.iter().map(|row| row.iter().filter(|e| **e).count()).sum()
    }
}
