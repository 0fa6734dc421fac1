//! Reusable simulation fixtures.
//!
//! - [`dipole_simulation`]: two opposite charges at rest, one unit apart
//!   from the origin on either side, interactions on.
//! - [`MICRO_DIPOLE_CHARGE`]: a charge small enough for the dipole to
//!   close in slowly at `dt = 0.1` instead of overshooting in one step.
//! - [`lone_particle_simulation`]: a single moving particle in zero
//!   fields. Not runnable.
//! - [`random_cloud`]: `n` particles at distinct positions, drawn from
//!   a seeded ChaCha8 RNG.

use coulomb_core::{DVec3, ParticleParams};
use coulomb_engine::{Simulation, SimulationConfig};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Dipole charge (10 µC) whose separation shrinks smoothly over one second.
pub const MICRO_DIPOLE_CHARGE: f64 = 1e-5;

/// `+charge` at `(-1, 0, 0)` and `-charge` at `(1, 0, 0)`, unit masses,
/// at rest.
pub fn dipole_params(charge: f64) -> [ParticleParams; 2] {
    [
        ParticleParams::new(1.0, charge, DVec3::new(-1.0, 0.0, 0.0), DVec3::ZERO),
        ParticleParams::new(1.0, -charge, DVec3::new(1.0, 0.0, 0.0), DVec3::ZERO),
    ]
}

/// The dipole over `T = 1`, `dt = 0.1`.
pub fn dipole_simulation(charge: f64) -> Simulation {
    let mut sim = Simulation::new(SimulationConfig::new(1.0, 0.1)).unwrap();
    for params in dipole_params(charge) {
        sim.add_particle(params).unwrap();
    }
    sim
}

/// Mass 1, charge 1, at the origin moving along X, zero fields.
pub fn lone_particle_simulation() -> Simulation {
    let mut sim = Simulation::new(SimulationConfig::new(1.0, 0.1)).unwrap();
    sim.add_particle(ParticleParams::new(1.0, 1.0, DVec3::ZERO, DVec3::X))
        .unwrap();
    sim
}

/// `n` particles on a jittered lattice so no two share a position.
///
/// Charges are micro-coulomb scale with random sign, masses in
/// `[0.5, 2)`, velocities in `[-1, 1)` per axis on the XY plane.
/// About one in five particles is stationary.
pub fn random_cloud(n: usize, seed: u64) -> Vec<ParticleParams> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let side = (n as f64).sqrt().ceil().max(1.0) as usize;
    (0..n)
        .map(|i| {
            let (gx, gy) = ((i % side) as f64, (i / side) as f64);
            let position = DVec3::new(
                gx + rng.random_range(-0.25..0.25),
                gy + rng.random_range(-0.25..0.25),
                0.0,
            );
            let velocity = DVec3::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0), 0.0);
            let magnitude = rng.random_range(1e-7..1e-5);
            let charge = if rng.random_bool(0.5) { magnitude } else { -magnitude };
            let mass = rng.random_range(0.5..2.0);
            ParticleParams::new(mass, charge, position, velocity).stationary(rng.random_bool(0.2))
        })
        .collect()
}

/// A simulation holding [`random_cloud`]`(n, seed)`.
pub fn random_simulation(config: SimulationConfig, n: usize, seed: u64) -> Simulation {
    let mut sim = Simulation::new(config).unwrap();
    for params in random_cloud(n, seed) {
        sim.add_particle(params).unwrap();
    }
    sim
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloud_is_deterministic() {
        assert_eq!(random_cloud(16, 7), random_cloud(16, 7));
        assert_ne!(random_cloud(16, 7), random_cloud(16, 8));
    }

    #[test]
    fn cloud_positions_are_distinct() {
        let cloud = random_cloud(50, 1);
        for (i, a) in cloud.iter().enumerate() {
            for b in &cloud[i + 1..] {
                assert_ne!(a.position, b.position);
            }
        }
    }

    #[test]
    fn dipole_is_runnable_and_lone_is_not() {
        assert!(dipole_simulation(1.0).validate());
        assert!(!lone_particle_simulation().validate());
    }
}
