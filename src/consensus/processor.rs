use std::collections::HashSet;

use tokio::{
    sync::{
        mpsc::{self, Receiver, Sender},
        oneshot,
    },
    task::JoinHandle,
};
use tracing::{debug, trace};

use super::{
    message::{Candidate, Transaction},
    node::{NodeSlot, Role},
};
use crate::error::SimulationError;

/*
    Every node runs inside its own processor task and is only reachable
    through its channel. The orchestrator owns the round clock: it asks all
    processors to propose, waits for every answer, and only then delivers
    the routed candidates. Processors never talk to each other.
*/

pub const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug)]
pub enum NodeMessage {
    Propose(oneshot::Sender<HashSet<Transaction>>),
    Deliver(HashSet<Candidate>, oneshot::Sender<()>),
}

pub struct NodeProcessor {
    pub id: usize,
    pub slot: NodeSlot,
    pub msg_rx: Receiver<NodeMessage>,
}

impl NodeProcessor {
    /// Serves messages until every sender is dropped, then hands the node back.
    pub async fn run(mut self) -> NodeSlot {
        trace!(node = self.id, role = %self.slot.role, "Running node processor");
        while let Some(message) = self.msg_rx.recv().await {
            match message {
                NodeMessage::Propose(reply) => {
                    let proposals = self.slot.node.send_to_followers();
                    trace!(node = self.id, count = proposals.len(), "Proposed");
                    // A dropped receiver means the orchestrator gave up on this round.
                    let _ = reply.send(proposals);
                }
                NodeMessage::Deliver(candidates, ack) => {
                    trace!(node = self.id, count = candidates.len(), "Delivered");
                    self.slot.node.receive_from_followees(&candidates);
                    let _ = ack.send(());
                }
            }
        }
        debug!(node = self.id, "Node processor stopped");
        self.slot
    }
}

/// Orchestrator side of a running processor.
pub struct NodeHandle {
    pub id: usize,
    pub role: Role,
    msg_tx: Sender<NodeMessage>,
    task: JoinHandle<NodeSlot>,
}

impl NodeHandle {
    pub fn spawn(id: usize, slot: NodeSlot) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let role = slot.role;
        let processor = NodeProcessor { id, slot, msg_rx };
        let task = tokio::spawn(processor.run());
        NodeHandle {
            id,
            role,
            msg_tx,
            task,
        }
    }

    pub async fn propose(&self) -> Result<oneshot::Receiver<HashSet<Transaction>>, SimulationError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.msg_tx
            .send(NodeMessage::Propose(reply_tx))
            .await
            .map_err(|_| SimulationError::NodeUnavailable(self.id))?;
        Ok(reply_rx)
    }

    pub async fn deliver(&self, candidates: HashSet<Candidate>) -> Result<oneshot::Receiver<()>, SimulationError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.msg_tx
            .send(NodeMessage::Deliver(candidates, ack_tx))
            .await
            .map_err(|_| SimulationError::NodeUnavailable(self.id))?;
        Ok(ack_rx)
    }

    /// Closes the channel and waits for the processor to return its node.
    pub async fn shutdown(self) -> Result<NodeSlot, SimulationError> {
        drop(self.msg_tx);
        Ok(self.task.await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::consensus::{compliant::CompliantNode, node::Node};

    #[tokio::test]
    async fn test_processor_serves_rounds_and_returns_node() {
        let mut node = CompliantNode::new(5);
        node.set_followees(Arc::from(vec![false, true]));
        node.set_pending_transaction([Transaction::new(1)].into_iter().collect());

        let handle = NodeHandle::spawn(0, NodeSlot::compliant(node));
        assert_eq!(handle.role, Role::Compliant);

        let proposals = handle.propose().await.unwrap().await.unwrap();
        assert_eq!(proposals.len(), 1);

        let candidates = [Candidate::new(Transaction::new(2), 1)].into_iter().collect();
        handle.deliver(candidates).await.unwrap().await.unwrap();

        let proposals = handle.propose().await.unwrap().await.unwrap();
        assert!(proposals.contains(&Transaction::new(2)));

        let slot = handle.shutdown().await.unwrap();
        assert!(!slot.node.is_blacklisted(1));
    }

    #[tokio::test]
    async fn test_processor_preserves_message_order() {
        let mut node = CompliantNode::new(5);
        node.set_followees(Arc::from(vec![false, true]));
        node.set_pending_transaction(HashSet::new());
        let handle = NodeHandle::spawn(3, NodeSlot::compliant(node));

        let first = handle.propose().await.unwrap();
        let ack = handle.deliver(HashSet::new()).await.unwrap();
        let second = handle.propose().await.unwrap();

        assert!(first.await.unwrap().is_empty());
        ack.await.unwrap();
        assert!(second.await.unwrap().is_empty());

        let slot = handle.shutdown().await.unwrap();
        assert!(slot.node.is_blacklisted(1));
    }
}
