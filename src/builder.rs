//! Table-driven bulk construction.
//!
//! Hosts often describe a whole graph up front: a list of node ids, some
//! with explicit placement, plus a list of (origin, target) pairs. This
//! module models that description as plain serde-friendly data and builds a
//! [`Graph`] from it, spawning unplaced nodes at uniformly random positions
//! inside a caller-given rectangle.
//!
//! Randomness lives only here. The simulation step itself is deterministic;
//! callers who need reproducible layouts pass a seeded [`Rng`].

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::geometry::{Bounds, Vec2};
use crate::graph::{Graph, GraphFactory, NodeKey};

/// One node in a bulk-build description.
///
/// Either a bare id (spawned at a random position inside the placement
/// region) or an explicit record with optional coordinates and anchor flag.
/// In serialized form the two shapes are distinguished structurally, so a
/// plain list may mix bare ids and records freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec<K> {
    /// Just an id; position is chosen randomly inside the region.
    Bare(K),
    /// An id with explicit placement. Missing coordinates fall back to
    /// random placement; `anchor` defaults to false.
    Explicit {
        id: K,
        #[serde(default)]
        x: Option<f32>,
        #[serde(default)]
        y: Option<f32>,
        #[serde(default)]
        anchor: bool,
    },
}

impl<K> From<K> for NodeSpec<K> {
    fn from(id: K) -> Self {
        NodeSpec::Bare(id)
    }
}

/// A whole-graph description: nodes plus (origin, target) edge pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSpec<K> {
    pub nodes: Vec<NodeSpec<K>>,
    #[serde(default)]
    pub edges: Vec<(K, K)>,
}

impl<K: NodeKey> Graph<K> {
    /// Build a graph with the stock node/edge types from a bulk
    /// description, placing unpositioned nodes randomly inside `region`.
    ///
    /// Construction errors (duplicate ids, unknown edge endpoints, self
    /// loops, duplicate pairs) propagate unchanged.
    pub fn from_spec(
        spec: &GraphSpec<K>,
        region: Bounds,
        rng: &mut impl Rng,
    ) -> Result<Self, GraphError<K>> {
        let mut graph = Graph::new();
        graph.populate(spec, region, rng)?;
        Ok(graph)
    }
}

impl<K: NodeKey, F: GraphFactory<K>> Graph<K, F> {
    /// Insert every node and edge of `spec` into this graph.
    ///
    /// Fails fast on the first violated invariant; nodes and edges added
    /// before the failure remain in the graph.
    pub fn populate(
        &mut self,
        spec: &GraphSpec<K>,
        region: Bounds,
        rng: &mut impl Rng,
    ) -> Result<(), GraphError<K>> {
        for node in &spec.nodes {
            match node {
                NodeSpec::Bare(id) => {
                    let position = random_position(region, rng);
                    self.add_node_at(id.clone(), position)?;
                }
                NodeSpec::Explicit { id, x, y, anchor } => {
                    let fallback = random_position(region, rng);
                    let position = Vec2::new(x.unwrap_or(fallback.x), y.unwrap_or(fallback.y));
                    if *anchor {
                        self.add_anchor(id.clone(), position)?;
                    } else {
                        self.add_node_at(id.clone(), position)?;
                    }
                }
            }
        }
        for (origin, target) in &spec.edges {
            self.connect(origin, target)?;
        }
        debug!(
            "populated graph from spec: {} node(s), {} edge(s)",
            spec.nodes.len(),
            spec.edges.len()
        );
        Ok(())
    }
}

fn random_position(region: Bounds, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        sample(rng, region.min_x, region.max_x),
        sample(rng, region.min_y, region.max_y),
    )
}

// gen_range panics on an empty range; a zero-extent axis pins the
// coordinate instead.
fn sample(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Body;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn region() -> Bounds {
        Bounds::new(-100.0, -50.0, 100.0, 50.0)
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_bare_nodes_land_inside_region() {
        let spec = GraphSpec {
            nodes: vec!["a".into(), "b".into(), "c".into()],
            edges: vec![],
        };
        let graph = Graph::from_spec(&spec, region(), &mut rng()).unwrap();

        assert_eq!(graph.node_count(), 3);
        graph.visit_nodes(|node| {
            let p = node.position();
            assert!((-100.0..100.0).contains(&p.x));
            assert!((-50.0..50.0).contains(&p.y));
            assert!(!node.is_anchor());
        });
    }

    #[test]
    fn test_explicit_nodes_use_given_placement() {
        let spec = GraphSpec {
            nodes: vec![
                NodeSpec::Explicit {
                    id: "pinned",
                    x: Some(10.0),
                    y: Some(20.0),
                    anchor: true,
                },
                NodeSpec::Explicit {
                    id: "half",
                    x: Some(3.0),
                    y: None,
                    anchor: false,
                },
            ],
            edges: vec![],
        };
        let graph = Graph::from_spec(&spec, region(), &mut rng()).unwrap();

        let pinned = graph.get_node(&"pinned").unwrap();
        assert_eq!(pinned.position(), Vec2::new(10.0, 20.0));
        assert!(pinned.is_anchor());

        let half = graph.get_node(&"half").unwrap();
        assert_eq!(half.position().x, 3.0);
        assert!((-50.0..50.0).contains(&half.position().y));
    }

    #[test]
    fn test_edges_are_built() {
        let spec = GraphSpec {
            nodes: vec!["a".into(), "b".into(), "c".into()],
            edges: vec![("a", "b"), ("b", "c")],
        };
        let graph = Graph::from_spec(&spec, region(), &mut rng()).unwrap();
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_construction_errors_propagate() {
        let dup = GraphSpec {
            nodes: vec!["a".into(), "a".into()],
            edges: vec![],
        };
        assert_eq!(
            Graph::from_spec(&dup, region(), &mut rng()).unwrap_err(),
            GraphError::DuplicateNode("a")
        );

        let dangling = GraphSpec {
            nodes: vec!["a".into()],
            edges: vec![("a", "ghost")],
        };
        assert_eq!(
            Graph::from_spec(&dangling, region(), &mut rng()).unwrap_err(),
            GraphError::UnknownNode("ghost")
        );
    }

    #[test]
    fn test_zero_extent_region_pins_coordinates() {
        let spec = GraphSpec {
            nodes: vec!["a".into()],
            edges: vec![],
        };
        let flat = Bounds::new(5.0, 5.0, 5.0, 5.0);
        let graph = Graph::from_spec(&spec, flat, &mut rng()).unwrap();
        assert_eq!(graph.get_node(&"a").unwrap().position(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_spec_round_trips_through_serde() {
        let json = r#"{"nodes": ["a", {"id": "b", "x": 1.0, "y": 2.0, "anchor": true}],
                       "edges": [["a", "b"]]}"#;
        let spec: GraphSpec<String> = serde_json::from_str(json).unwrap();

        assert_eq!(spec.nodes[0], NodeSpec::Bare("a".to_string()));
        assert_eq!(
            spec.nodes[1],
            NodeSpec::Explicit {
                id: "b".to_string(),
                x: Some(1.0),
                y: Some(2.0),
                anchor: true,
            }
        );
        assert_eq!(spec.edges, vec![("a".to_string(), "b".to_string())]);
    }
}
