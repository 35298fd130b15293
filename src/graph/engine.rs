//! Graph container and the per-frame simulation step.
//!
//! The graph owns:
//! - Topology via petgraph's StableGraph (node/edge weights are the
//!   factory-constructed node and edge values)
//! - A map from caller-chosen node keys to stable node indices
//! - A map from monotonic edge ids to stable edge indices
//! - The bounding box derived by the most recent update
//!
//! The update step is O(E) for edge attraction plus O(N²) for pairwise
//! repulsion. That quadratic cost is the design: there is no spatial
//! acceleration structure, and hosts with large graphs own the trade-off.

use std::collections::HashMap;

use log::{debug, trace};
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;

use crate::error::GraphError;
use crate::geometry::{Bounds, Vec2};
use crate::graph::edge::{EdgeId, Link};
use crate::graph::factory::{DefaultFactory, GraphFactory};
use crate::graph::node::{Body, NodeKey};
use crate::params::SimulationParameters;

/// A force-directed graph: node/edge storage plus the physics step.
///
/// `K` is the caller-chosen node key type; `F` decides which node and edge
/// types the graph stores (see [`GraphFactory`]). The engine assumes
/// exclusive single-writer access; `&mut self` on every mutating call is
/// the whole concurrency story.
#[derive(Debug)]
pub struct Graph<K: NodeKey, F: GraphFactory<K> = DefaultFactory> {
    graph: StableGraph<F::Node, F::Edge>,

    /// Caller key to petgraph index.
    index_of: HashMap<K, NodeIndex>,

    /// Stable edge id to petgraph index.
    edge_index_of: HashMap<EdgeId, EdgeIndex>,

    /// Next edge id. Only ever increments; ids are not recycled, even
    /// after removals or `clear`, so stale ids cannot alias new edges.
    next_edge_id: u32,

    /// Bounding box from the most recent update. `None` until the first
    /// update runs, and after an update over an empty node set.
    bounds: Option<Bounds>,

    /// Optional global pull target. Applied to every non-anchored node
    /// each step, keeping disconnected components from drifting apart
    /// indefinitely.
    attraction_point: Option<Vec2>,

    params: SimulationParameters,
    factory: F,
}

impl<K: NodeKey> Graph<K> {
    /// Create an empty graph with the stock node/edge types and default
    /// parameters.
    pub fn new() -> Self {
        Self::with_factory(DefaultFactory, SimulationParameters::default())
    }

    /// Create an empty graph with the stock node/edge types and explicit
    /// tuning parameters.
    pub fn with_parameters(params: SimulationParameters) -> Self {
        Self::with_factory(DefaultFactory, params)
    }
}

impl<K: NodeKey> Default for Graph<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: NodeKey, F: GraphFactory<K>> Graph<K, F> {
    /// Create an empty graph whose node/edge values are built by `factory`.
    ///
    /// The factory is fixed for the graph's lifetime; substituting node
    /// types mid-simulation is not expressible, by construction.
    pub fn with_factory(factory: F, params: SimulationParameters) -> Self {
        Self {
            graph: StableGraph::new(),
            index_of: HashMap::new(),
            edge_index_of: HashMap::new(),
            next_edge_id: 0,
            bounds: None,
            attraction_point: None,
            params,
            factory,
        }
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Register a node at the origin, unanchored.
    ///
    /// Fails with [`GraphError::DuplicateNode`] if `id` is already present;
    /// the existing node is left untouched.
    pub fn add_node(&mut self, id: K) -> Result<&mut F::Node, GraphError<K>> {
        self.insert_node(id, Vec2::ZERO, false)
    }

    /// Register a node at an explicit position, unanchored.
    pub fn add_node_at(&mut self, id: K, position: Vec2) -> Result<&mut F::Node, GraphError<K>> {
        self.insert_node(id, position, false)
    }

    /// Register an anchored node at an explicit position.
    pub fn add_anchor(&mut self, id: K, position: Vec2) -> Result<&mut F::Node, GraphError<K>> {
        self.insert_node(id, position, true)
    }

    fn insert_node(
        &mut self,
        id: K,
        position: Vec2,
        anchor: bool,
    ) -> Result<&mut F::Node, GraphError<K>> {
        if self.index_of.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        let node = self
            .factory
            .node(id.clone(), position, anchor, self.params.default_mass);
        let index = self.graph.add_node(node);
        self.index_of.insert(id, index);
        Ok(&mut self.graph[index])
    }

    /// Remove a node and every edge incident to it, in both directions.
    ///
    /// Unconditional: an unknown id is not an error, it just returns `None`.
    pub fn remove_node(&mut self, id: &K) -> Option<F::Node> {
        let index = self.index_of.remove(id)?;

        let incident: Vec<EdgeIndex> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .chain(self.graph.edges_directed(index, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        for ei in &incident {
            let edge_id = self.graph[*ei].id();
            self.edge_index_of.remove(&edge_id);
        }
        if !incident.is_empty() {
            debug!(
                "removing node {:?} cascades to {} incident edge(s)",
                id,
                incident.len()
            );
        }

        // petgraph drops the incident edges along with the node.
        self.graph.remove_node(index)
    }

    /// Whether a node with this id is registered.
    pub fn has_node(&self, id: &K) -> bool {
        self.index_of.contains_key(id)
    }

    /// Look up a node by id. Absence is an empty result, not an error.
    pub fn get_node(&self, id: &K) -> Option<&F::Node> {
        self.index_of.get(id).map(|&index| &self.graph[index])
    }

    /// Mutable lookup, for direct position/mass/anchor overrides.
    pub fn get_node_mut(&mut self, id: &K) -> Option<&mut F::Node> {
        self.index_of
            .get(id)
            .map(|&index| &mut self.graph[index])
    }

    /// Relocate the node to `position` and anchor it there, atomically.
    ///
    /// Fails with [`GraphError::UnknownNode`] if `id` is not registered.
    pub fn set_anchor(&mut self, id: &K, position: Vec2) -> Result<(), GraphError<K>> {
        let &index = self
            .index_of
            .get(id)
            .ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
        self.graph[index].anchor_at(position);
        Ok(())
    }

    /// Find the first node whose axis-aligned box of half-width `range`
    /// contains `point`.
    ///
    /// Linear scan. When several nodes qualify, the earliest-inserted one
    /// wins; that tie-break is deterministic and part of the contract.
    pub fn node_at(&self, point: Vec2, range: f32) -> Option<&F::Node> {
        self.graph
            .node_indices()
            .map(|index| &self.graph[index])
            .find(|node| {
                let p = node.position();
                (p.x - point.x).abs() <= range && (p.y - point.y).abs() <= range
            })
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    // =========================================================================
    // Edge Operations
    // =========================================================================

    /// Create a directed edge from `origin` to `target`.
    ///
    /// Fails with [`GraphError::SelfLoop`] when the endpoints are equal,
    /// [`GraphError::UnknownNode`] when either endpoint is unregistered,
    /// and [`GraphError::DuplicateEdge`] when this ordered pair is already
    /// connected. Edge ids come from an ever-incrementing counter and are
    /// never reused.
    pub fn connect(&mut self, origin: &K, target: &K) -> Result<EdgeId, GraphError<K>> {
        if origin == target {
            return Err(GraphError::SelfLoop(origin.clone()));
        }
        let &oi = self
            .index_of
            .get(origin)
            .ok_or_else(|| GraphError::UnknownNode(origin.clone()))?;
        let &ti = self
            .index_of
            .get(target)
            .ok_or_else(|| GraphError::UnknownNode(target.clone()))?;
        if self.graph.find_edge(oi, ti).is_some() {
            return Err(GraphError::DuplicateEdge {
                origin: origin.clone(),
                target: target.clone(),
            });
        }

        let id = EdgeId::new(self.next_edge_id);
        self.next_edge_id += 1;

        let edge = self.factory.edge(id, origin.clone(), target.clone());
        let index = self.graph.add_edge(oi, ti, edge);
        self.edge_index_of.insert(id, index);
        Ok(id)
    }

    /// Remove a single edge by id. Returns whether it existed.
    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        match self.edge_index_of.remove(&id) {
            Some(index) => self.graph.remove_edge(index).is_some(),
            None => false,
        }
    }

    /// Remove every edge whose origin or target is `id`. Returns the number
    /// removed; an unknown id removes nothing.
    pub fn remove_edges(&mut self, id: &K) -> usize {
        let Some(&index) = self.index_of.get(id) else {
            return 0;
        };
        let incident: Vec<EdgeIndex> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .chain(self.graph.edges_directed(index, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        for ei in &incident {
            let edge_id = self.graph[*ei].id();
            self.edge_index_of.remove(&edge_id);
            self.graph.remove_edge(*ei);
        }
        incident.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Advance the simulation by one step of `dt`.
    pub fn update(&mut self, dt: f32) {
        self.update_with(dt, |_| {}, |_| {});
    }

    /// Advance the simulation by one step, invoking `edge_cb` once per edge
    /// (right after its attraction is applied) and `node_cb` once per node
    /// (after all integration, while bounds are folded).
    ///
    /// Step order is a contract: every edge's mutual attraction is applied
    /// before any repulsion, and each node's repulsion is fully accumulated
    /// before that node integrates. Integration consumes the accumulated
    /// acceleration, so interleaving would silently drop force
    /// contributions.
    ///
    /// Repulsion reads positions snapshotted at the start of the pass,
    /// which makes pairwise forces exactly symmetric and the step
    /// independent of storage order.
    pub fn update_with(
        &mut self,
        dt: f32,
        mut node_cb: impl FnMut(&F::Node),
        mut edge_cb: impl FnMut(&F::Edge),
    ) {
        trace!(
            "update: {} node(s), {} edge(s), dt {}",
            self.graph.node_count(),
            self.graph.edge_count(),
            dt
        );

        // 1. Mutual spring attraction along every edge.
        let edge_indices: Vec<EdgeIndex> = self.graph.edge_indices().collect();
        for ei in edge_indices {
            let Some((oi, ti)) = self.graph.edge_endpoints(ei) else {
                continue;
            };
            // Self-loops are rejected at connect time, so oi != ti here.
            let (origin, target) = self.graph.index_twice_mut(oi, ti);
            let origin_pos = origin.position();
            let target_pos = target.position();
            origin.attract_to(target_pos, &self.params);
            target.attract_to(origin_pos, &self.params);
            edge_cb(&self.graph[ei]);
        }

        // 2. Snapshot positions and masses for the repulsion pass.
        let snapshot: Vec<(NodeIndex, Vec2, f32)> = self
            .graph
            .node_indices()
            .map(|index| {
                let node = &self.graph[index];
                (index, node.position(), node.mass())
            })
            .collect();

        // 3. Accumulate repulsion and integrate, one non-anchored node at
        //    a time. Anchored nodes are skipped here but still act as
        //    repulsion sources through the snapshot.
        for &(ai, _, _) in &snapshot {
            let node = &mut self.graph[ai];
            if node.is_anchor() {
                continue;
            }
            for &(bi, other_pos, other_mass) in &snapshot {
                if bi == ai {
                    continue;
                }
                node.repel_from(other_pos, other_mass, &self.params);
            }
            if let Some(point) = self.attraction_point {
                node.attract_to(point, &self.params);
            }
            node.integrate(dt, &self.params);
        }

        // 4. Node callbacks and bounds, anchored nodes included.
        let mut bounds: Option<Bounds> = None;
        for index in self.graph.node_indices() {
            let node = &self.graph[index];
            node_cb(node);
            match bounds.as_mut() {
                Some(b) => b.include(node.position()),
                None => bounds = Some(Bounds::point(node.position())),
            }
        }
        self.bounds = bounds;
    }

    // =========================================================================
    // Read-side Traversal
    // =========================================================================

    /// Pure read-only traversal: `edge_cb` once per edge with both endpoint
    /// node handles, then `node_cb` once per node. No ordering guarantee
    /// across entities.
    pub fn draw(
        &self,
        mut node_cb: impl FnMut(&F::Node),
        mut edge_cb: impl FnMut(&F::Edge, &F::Node, &F::Node),
    ) {
        for ei in self.graph.edge_indices() {
            if let Some((oi, ti)) = self.graph.edge_endpoints(ei) {
                edge_cb(&self.graph[ei], &self.graph[oi], &self.graph[ti]);
            }
        }
        for index in self.graph.node_indices() {
            node_cb(&self.graph[index]);
        }
    }

    /// Visit every node read-only.
    pub fn visit_nodes(&self, mut f: impl FnMut(&F::Node)) {
        for index in self.graph.node_indices() {
            f(&self.graph[index]);
        }
    }

    /// Visit every edge read-only.
    pub fn visit_edges(&self, mut f: impl FnMut(&F::Edge)) {
        for ei in self.graph.edge_indices() {
            f(&self.graph[ei]);
        }
    }

    // =========================================================================
    // Derived State
    // =========================================================================

    /// Bounding box from the most recent update, or `None` if no update has
    /// run yet (or the graph was empty when it did).
    pub fn boundaries(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Midpoint of the current bounding box.
    ///
    /// Fails with [`GraphError::BoundariesUnavailable`] before the first
    /// update rather than manufacturing coordinates from absent bounds.
    pub fn center(&self) -> Result<Vec2, GraphError<K>> {
        self.bounds
            .map(|b| b.center())
            .ok_or(GraphError::BoundariesUnavailable)
    }

    /// The global pull target, if one is set.
    pub fn attraction_point(&self) -> Option<Vec2> {
        self.attraction_point
    }

    /// Install or clear the global pull target applied to every
    /// non-anchored node each step.
    pub fn set_attraction_point(&mut self, point: Option<Vec2>) {
        self.attraction_point = point;
    }

    /// Current tuning parameters.
    pub fn parameters(&self) -> &SimulationParameters {
        &self.params
    }

    /// Mutable access to the tuning parameters.
    pub fn parameters_mut(&mut self) -> &mut SimulationParameters {
        &mut self.params
    }

    /// Remove all nodes and edges. Bounds reset to "not yet computed"; the
    /// edge-id counter is deliberately not rewound.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.index_of.clear();
        self.edge_index_of.clear();
        self.bounds = None;
    }
}
