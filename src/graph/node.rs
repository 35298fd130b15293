//! Node physics: the point-mass model driven by the simulation step.
//!
//! Each node carries:
//! - A caller-chosen identifier (opaque to the engine, unique per graph)
//! - Position (x, y) in graph space
//! - Velocity and accumulated acceleration for the force simulation
//! - Mass, which scales repulsion
//! - An anchor flag (excluded from integration when true)
//!
//! Force accumulation and integration are split on purpose: the graph
//! applies many force contributions per node per step (one attraction per
//! incident edge, one repulsion per other node) before a single
//! [`Body::integrate`] call consumes them.

use std::fmt;
use std::hash::Hash;

use crate::geometry::Vec2;
use crate::params::SimulationParameters;

/// Marker for types usable as node identifiers.
///
/// Blanket-implemented for anything cloneable, hashable, and debuggable, so
/// hosts can key nodes by strings, integers, or their own id newtypes.
pub trait NodeKey: Clone + Eq + Hash + fmt::Debug {}

impl<T: Clone + Eq + Hash + fmt::Debug> NodeKey for T {}

/// The physics contract a node type must satisfy.
///
/// [`Node`] is the stock implementation; hosts that need richer per-node
/// data implement this trait on their own type (a strict superset of the
/// stock capability set) and install it through a
/// [`GraphFactory`](crate::GraphFactory). The graph drives nodes only
/// through this trait.
///
/// `attract_to`, `repel_from`, and `anchor_at` have default implementations
/// in terms of the required accessors, so a custom body inherits the stock
/// force math unless it overrides them.
pub trait Body<K> {
    /// The identifier this node was registered under.
    fn id(&self) -> &K;

    /// Current position.
    fn position(&self) -> Vec2;

    /// Overwrite the position directly, bypassing the physics.
    fn set_position(&mut self, position: Vec2);

    /// Whether this node is anchored (frozen in place).
    fn is_anchor(&self) -> bool;

    /// Set or clear the anchor flag without moving the node.
    fn set_anchor(&mut self, anchor: bool);

    /// Mass of this node. Scales repulsion strength.
    fn mass(&self) -> f32;

    /// Replace the mass.
    fn set_mass(&mut self, mass: f32);

    /// Accumulate a force into the node's acceleration, clamping each
    /// component to `[-force_max, force_max]` so a single step's
    /// contribution stays bounded however close two nodes get.
    fn apply_force(&mut self, force: Vec2, params: &SimulationParameters);

    /// Semi-implicit Euler step: velocity picks up the accumulated
    /// acceleration scaled by `dt * node_speed`, damping bleeds energy,
    /// position advances by the velocity, and the acceleration resets.
    ///
    /// This never checks the anchor flag; the graph is responsible for
    /// skipping the call on anchored nodes.
    fn integrate(&mut self, dt: f32, params: &SimulationParameters);

    /// Spring attraction toward `target`: unit direction times
    /// `force_spring * distance`, pulling this node toward the target.
    ///
    /// Coincident points have no direction to normalize and contribute no
    /// force; the epsilon guard is what keeps a zero distance from turning
    /// into a division by zero.
    fn attract_to(&mut self, target: Vec2, params: &SimulationParameters) {
        let d = target - self.position();
        let dist = d.length();
        if dist <= f32::EPSILON {
            return;
        }
        let dir = d / dist;
        self.apply_force(dir * (params.force_spring * dist), params);
    }

    /// Inverse-square repulsion away from `other`, scaled by both masses.
    ///
    /// The distance in the magnitude is floor-clamped to
    /// `params.min_distance`; exactly coincident points contribute no
    /// force (same guard as [`Body::attract_to`]).
    fn repel_from(&mut self, other: Vec2, other_mass: f32, params: &SimulationParameters) {
        let d = self.position() - other;
        let dist = d.length();
        if dist <= f32::EPSILON {
            return;
        }
        let dir = d / dist;
        let clamped = dist.max(params.min_distance);
        let magnitude = params.force_charge * (self.mass() * other_mass) / (clamped * clamped);
        self.apply_force(dir * magnitude, params);
    }

    /// Relocate to `position` and anchor there, atomically from the
    /// caller's point of view (one `&mut` call, no intermediate state).
    fn anchor_at(&mut self, position: Vec2) {
        self.set_position(position);
        self.set_anchor(true);
    }
}

/// The stock point-mass node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<K> {
    id: K,
    position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    mass: f32,
    anchor: bool,
}

impl<K> Node<K> {
    /// Create a node at `position` with the given anchor flag and mass.
    pub fn new(id: K, position: Vec2, anchor: bool, mass: f32) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass,
            anchor,
        }
    }

    /// Current velocity. Read-only; velocity changes only through force
    /// application and integration.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

impl<K: NodeKey> Body<K> for Node<K> {
    #[inline]
    fn id(&self) -> &K {
        &self.id
    }

    #[inline]
    fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    #[inline]
    fn is_anchor(&self) -> bool {
        self.anchor
    }

    #[inline]
    fn set_anchor(&mut self, anchor: bool) {
        self.anchor = anchor;
    }

    #[inline]
    fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
    }

    fn apply_force(&mut self, force: Vec2, params: &SimulationParameters) {
        let max = params.force_max;
        self.acceleration.x = (self.acceleration.x + force.x).clamp(-max, max);
        self.acceleration.y = (self.acceleration.y + force.y).clamp(-max, max);
    }

    fn integrate(&mut self, dt: f32, params: &SimulationParameters) {
        self.velocity += self.acceleration * (dt * params.node_speed);
        self.velocity *= params.damping_factor;
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
    }

    fn anchor_at(&mut self, position: Vec2) {
        self.position = position;
        self.anchor = true;
        // A frozen node keeps no leftover motion to release later.
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> SimulationParameters {
        SimulationParameters::default()
    }

    fn node(x: f32, y: f32) -> Node<&'static str> {
        Node::new("n", Vec2::new(x, y), false, 1.0)
    }

    #[test]
    fn test_attraction_pulls_toward_target() {
        let params = params();
        let mut a = node(0.0, 0.0);
        a.attract_to(Vec2::new(10.0, 0.0), &params);
        a.integrate(1.0, &params);

        assert!(a.position().x > 0.0);
        assert_relative_eq!(a.position().y, 0.0);
    }

    #[test]
    fn test_attraction_scales_with_distance() {
        let params = params();
        let mut near = node(0.0, 0.0);
        let mut far = node(0.0, 0.0);
        near.attract_to(Vec2::new(5.0, 0.0), &params);
        far.attract_to(Vec2::new(50.0, 0.0), &params);
        near.integrate(1.0, &params);
        far.integrate(1.0, &params);

        assert!(far.position().x > near.position().x);
    }

    #[test]
    fn test_repulsion_pushes_away() {
        let params = params();
        let mut a = node(1.0, 0.0);
        a.repel_from(Vec2::new(3.0, 0.0), 1.0, &params);
        a.integrate(1.0, &params);

        assert!(a.position().x < 1.0);
        assert_relative_eq!(a.position().y, 0.0);
    }

    #[test]
    fn test_repulsion_scales_with_mass() {
        let params = params();
        let mut light = node(0.0, 0.0);
        let mut heavy = node(0.0, 0.0);
        heavy.set_mass(4.0);

        light.repel_from(Vec2::new(10.0, 0.0), 1.0, &params);
        heavy.repel_from(Vec2::new(10.0, 0.0), 1.0, &params);
        light.integrate(1.0, &params);
        heavy.integrate(1.0, &params);

        assert!(heavy.position().x < light.position().x);
    }

    #[test]
    fn test_coincident_points_produce_no_nan() {
        let params = params();
        let mut a = node(2.0, 2.0);
        a.attract_to(Vec2::new(2.0, 2.0), &params);
        a.repel_from(Vec2::new(2.0, 2.0), 1.0, &params);
        a.integrate(1.0, &params);

        assert!(a.position().x.is_finite());
        assert!(a.position().y.is_finite());
        assert_eq!(a.position(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_near_coincident_repulsion_is_floor_clamped() {
        let params = params();
        let mut a = node(0.0, 0.0);
        // Far inside min_distance: magnitude must match the floor distance,
        // not blow up toward infinity.
        a.repel_from(Vec2::new(0.001, 0.0), 1.0, &params);
        a.integrate(1.0, &params);

        assert!(a.position().x.is_finite());
        assert!(a.position().x < 0.0);
    }

    #[test]
    fn test_force_accumulation_is_clamped() {
        let params = params();
        let mut a = node(0.0, 0.0);
        for _ in 0..100 {
            a.apply_force(Vec2::new(params.force_max, 0.0), &params);
        }
        a.integrate(1.0, &params);

        let expected = params.force_max * params.node_speed * params.damping_factor;
        assert_relative_eq!(a.position().x, expected, epsilon = 1e-3);
    }

    #[test]
    fn test_integration_resets_acceleration() {
        let params = params();
        let mut a = node(0.0, 0.0);
        a.apply_force(Vec2::new(1.0, 0.0), &params);
        a.integrate(1.0, &params);
        let after_first = a.position().x;

        // No new forces: only damped residual velocity remains.
        a.integrate(1.0, &params);
        let second_step = a.position().x - after_first;
        assert!(second_step < after_first);
        assert!(second_step > 0.0);
    }

    #[test]
    fn test_damping_dissipates_velocity() {
        let params = params();
        let mut a = node(0.0, 0.0);
        a.apply_force(Vec2::new(10.0, 0.0), &params);
        a.integrate(1.0, &params);

        let v0 = a.velocity().length();
        for _ in 0..50 {
            a.integrate(1.0, &params);
        }
        assert!(a.velocity().length() < v0 * 0.01);
    }

    #[test]
    fn test_anchor_at_is_atomic() {
        let mut a = node(0.0, 0.0);
        a.apply_force(Vec2::new(5.0, 5.0), &params());
        a.anchor_at(Vec2::new(50.0, 50.0));

        assert!(a.is_anchor());
        assert_eq!(a.position(), Vec2::new(50.0, 50.0));
        assert_eq!(a.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_set_anchor_keeps_position() {
        let mut a = node(3.0, 4.0);
        a.set_anchor(true);
        assert!(a.is_anchor());
        assert_eq!(a.position(), Vec2::new(3.0, 4.0));

        a.set_anchor(false);
        assert!(!a.is_anchor());
    }
}
