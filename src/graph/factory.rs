//! Pluggable node/edge construction.
//!
//! The factory is the seam through which hosts substitute their own node and
//! edge types: a value passed to [`Graph::with_factory`](crate::Graph), not
//! a process-wide global, so two graphs in the same process can use
//! different types without hidden coupling. Everything the graph does with
//! the constructed values goes through the [`Body`] and [`Link`] traits.

use crate::geometry::Vec2;
use crate::graph::edge::{Edge, EdgeId, Link};
use crate::graph::node::{Body, Node, NodeKey};

/// Constructs the node and edge values a graph stores.
pub trait GraphFactory<K: NodeKey> {
    /// The node type all graphs built with this factory store.
    type Node: Body<K>;
    /// The edge type all graphs built with this factory store.
    type Edge: Link<K>;

    /// Build a node for `id` at `position`.
    fn node(&self, id: K, position: Vec2, anchor: bool, mass: f32) -> Self::Node;

    /// Build an edge for the ordered (origin, target) pair.
    fn edge(&self, id: EdgeId, origin: K, target: K) -> Self::Edge;
}

/// Factory producing the stock [`Node`] and [`Edge`] types.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFactory;

impl<K: NodeKey> GraphFactory<K> for DefaultFactory {
    type Node = Node<K>;
    type Edge = Edge<K>;

    fn node(&self, id: K, position: Vec2, anchor: bool, mass: f32) -> Node<K> {
        Node::new(id, position, anchor, mass)
    }

    fn edge(&self, id: EdgeId, origin: K, target: K) -> Edge<K> {
        Edge::new(id, origin, target)
    }
}
