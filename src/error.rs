//! Error taxonomy for graph construction and queries.
//!
//! Every variant is a programmer error in how the host builds or queries the
//! graph, surfaced synchronously at the violating call site. None of them is
//! transient; callers should treat an `Err` as a bug, not retry it. The
//! simulation step itself has no failure mode once these preconditions hold.

use std::fmt;

use thiserror::Error;

/// Errors raised by [`Graph`](crate::Graph) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError<K: fmt::Debug> {
    /// A node with this id is already registered.
    #[error("node {0:?} is already present in the graph")]
    DuplicateNode(K),

    /// An operation referenced a node id that is not registered.
    #[error("node {0:?} is not present in the graph")]
    UnknownNode(K),

    /// An edge from a node to itself was requested.
    #[error("cannot connect node {0:?} to itself")]
    SelfLoop(K),

    /// An edge with this ordered (origin, target) pair already exists.
    #[error("edge {origin:?} -> {target:?} already exists")]
    DuplicateEdge { origin: K, target: K },

    /// Boundaries were queried before any update computed them.
    #[error("boundaries are unavailable until the first update")]
    BoundariesUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err: GraphError<&str> = GraphError::DuplicateNode("a");
        assert_eq!(err.to_string(), "node \"a\" is already present in the graph");

        let err: GraphError<&str> = GraphError::DuplicateEdge {
            origin: "a",
            target: "b",
        };
        assert_eq!(err.to_string(), "edge \"a\" -> \"b\" already exists");

        let err: GraphError<u32> = GraphError::BoundariesUnavailable;
        assert_eq!(
            err.to_string(),
            "boundaries are unavailable until the first update"
        );
    }
}
