pub mod compliant;
pub mod malicious;
pub mod message;
pub mod node;
pub mod peers;
pub mod processor;

pub use compliant::*;
pub use malicious::*;
pub use message::*;
pub use node::*;
pub use peers::*;
pub use processor::*;
