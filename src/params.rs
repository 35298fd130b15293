//! Simulation tuning parameters.

/// Default mass assigned to nodes created without an explicit mass.
pub const DEFAULT_MASS: f32 = 1.0;

/// Tuning constants for the force simulation.
///
/// One value of this struct is attached to a [`Graph`](crate::Graph) at
/// construction and threaded through every force computation. The defaults
/// are tuned so that the spring force dominates repulsion at typical edge
/// lengths: connected nodes pull together, unconnected ones spread out.
///
/// The spring is a plain Hooke pull toward the other endpoint with
/// magnitude `force_spring * distance`. Some historical layouts attenuate
/// this pull by half under a different constant; this crate does not.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParameters {
    /// Repulsion strength. Scales the inverse-square push between every
    /// node pair, multiplied by both masses.
    pub force_charge: f32,
    /// Spring constant for edge attraction.
    pub force_spring: f32,
    /// Component-wise clamp applied to accumulated acceleration. Bounds the
    /// contribution of a single step when nodes get pathologically close.
    pub force_max: f32,
    /// Scale factor from accumulated acceleration to velocity per unit `dt`.
    pub node_speed: f32,
    /// Per-step velocity multiplier, strictly below 1. Dissipates energy so
    /// the layout can settle.
    pub damping_factor: f32,
    /// Floor for the distance used in force magnitudes. Keeps coincident or
    /// near-coincident nodes from producing unbounded forces.
    pub min_distance: f32,
    /// Mass given to nodes built by the default factory.
    pub default_mass: f32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            force_charge: 100.0,
            force_spring: 0.5,
            force_max: 100.0,
            node_speed: 8.0,
            damping_factor: 0.9,
            min_distance: 1.0,
            default_mass: DEFAULT_MASS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_stable() {
        let params = SimulationParameters::default();
        assert!(params.damping_factor < 1.0);
        assert!(params.min_distance > 0.0);
        assert!(params.default_mass > 0.0);
        // Spring must win over repulsion at moderate range so that two
        // connected unit-mass nodes ten units apart approach each other.
        assert!(params.force_spring * 10.0 > params.force_charge / 100.0);
    }
}
