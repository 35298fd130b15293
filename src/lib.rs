//! spring-layout - Force-Directed Graph Layout
//!
//! A 2D force-directed layout engine for arbitrary directed graphs.
//! The crate owns the graph data model and the physics step; hosts own
//! rendering and stepping cadence, observing the layout through read-only
//! callbacks.
//!
//! # Architecture
//!
//! - `graph`: node/edge model, the [`Graph`] container, and the update loop
//! - `geometry`: [`Vec2`] and [`Bounds`] helpers
//! - `params`: [`SimulationParameters`] tuning constants
//! - `builder`: serde-friendly bulk construction with random placement
//! - `error`: the [`GraphError`] taxonomy
//!
//! # Model
//!
//! Each simulation step applies spring attraction along every edge
//! (mutual, Hooke-style pull), inverse-square repulsion between every node
//! pair (O(n²), exhaustive by design), then integrates each non-anchored
//! node with damped semi-implicit Euler and recomputes the bounding box.
//! Anchored nodes stay put but keep repelling their neighbors.
//!
//! # Example
//!
//! ```
//! use spring_layout::{Graph, Vec2};
//!
//! let mut graph: Graph<&str> = Graph::new();
//! graph.add_node_at("a", Vec2::new(0.0, 0.0)).unwrap();
//! graph.add_node_at("b", Vec2::new(10.0, 0.0)).unwrap();
//! graph.connect(&"a", &"b").unwrap();
//!
//! for _ in 0..60 {
//!     graph.update(1.0 / 60.0);
//! }
//!
//! let bounds = graph.boundaries().expect("update computed bounds");
//! assert!(bounds.width() >= 0.0);
//! ```

pub mod builder;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod params;

pub use builder::{GraphSpec, NodeSpec};
pub use error::GraphError;
pub use geometry::{Bounds, Vec2};
pub use graph::{Body, DefaultFactory, Edge, EdgeId, Graph, GraphFactory, Link, Node, NodeKey};
pub use params::{DEFAULT_MASS, SimulationParameters};
