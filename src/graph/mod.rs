//! Graph data model and simulation loop.
//!
//! Topology is stored in petgraph's StableGraph so node and edge indices
//! survive removals; hash maps bridge caller-chosen node keys and stable
//! edge ids to the internal indices.

mod edge;
mod engine;
mod factory;
mod node;

pub use edge::{Edge, EdgeId, Link};
pub use engine::Graph;
pub use factory::{DefaultFactory, GraphFactory};
pub use node::{Body, Node, NodeKey};
