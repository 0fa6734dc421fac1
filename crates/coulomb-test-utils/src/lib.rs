//! Test fixtures for Coulomb simulator development.
//!
//! Scenario builders used across the engine tests and benches, a
//! seeded random particle cloud, and a scratch directory helper for
//! save/load tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::fs;
use std::path::PathBuf;

pub use fixtures::{
    dipole_params, dipole_simulation, lone_particle_simulation, random_cloud,
    random_simulation, MICRO_DIPOLE_CHARGE,
};

/// Fresh, empty directory under the system temp dir, unique per test
/// name and process.
pub fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("coulomb-{test}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}
