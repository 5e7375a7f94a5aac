pub mod graph;
pub mod router;

pub use graph::*;
pub use router::*;

/*
    There is no transport: the follow-graph is the network. A node only ever
    hears from the nodes it follows, and only through candidates built by
    the router for the current round. Delivery is synchronous and reliable,
    so a followee that stays silent is silent by choice.
*/
