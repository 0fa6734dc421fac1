//! Benchmark profiles for the Coulomb simulator.
//!
//! - [`reference_profile`]: 64 particles over 1 s at 10 ms steps
//! - [`stress_profile`]: 256 particles over 1 s at 1 ms steps
//! - [`field_only_profile`]: 256 non-interacting particles in crossed
//!   fields, isolating the per-particle kernel cost from the pairwise sum

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use coulomb_engine::{Simulation, SimulationConfig};
use coulomb_test_utils::random_simulation;

/// Build the reference profile: 64 particles, 100 steps.
pub fn reference_profile(seed: u64) -> Simulation {
    random_simulation(SimulationConfig::new(1.0, 0.01), 64, seed)
}

/// Build the stress profile: 256 particles, 1000 steps.
pub fn stress_profile(seed: u64) -> Simulation {
    random_simulation(SimulationConfig::new(1.0, 0.001), 256, seed)
}

/// Build the field-only profile: 256 particles, interactions off,
/// `E = (1, 0, 0)` and `B = (0, 0, 1)`, 1000 steps.
pub fn field_only_profile(seed: u64) -> Simulation {
    let config = SimulationConfig::new(1.0, 0.001).interactions(false);
    let mut sim = random_simulation(config, 256, seed);
    sim.set_electric(1.0, 0.0).unwrap();
    sim.set_magnetic(1.0).unwrap();
    sim
}

/// Run `sim` to completion on its worker and return it.
pub fn run_blocking(mut sim: Simulation) -> Simulation {
    assert!(sim.begin_calculations().unwrap(), "profile must be runnable");
    sim.wait().unwrap();
    sim
}
