//! Coulomb: charged point particles under mutual Coulomb forces and
//! uniform external electric and magnetic fields.
//!
//! This is the top-level facade crate that re-exports the public API of
//! the Coulomb sub-crates. For most users, adding `coulomb` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use coulomb::prelude::*;
//!
//! let mut sim = Simulation::new(SimulationConfig::new(1.0, 0.1)).unwrap();
//! sim.add_particle(ParticleParams::new(1.0, 1e-5, DVec3::new(-1.0, 0.0, 0.0), DVec3::ZERO))
//!     .unwrap();
//! sim.add_particle(ParticleParams::new(1.0, -1e-5, DVec3::new(1.0, 0.0, 0.0), DVec3::ZERO))
//!     .unwrap();
//! sim.set_magnetic(0.5).unwrap();
//!
//! assert!(sim.begin_calculations().unwrap());
//! while !sim.collect().unwrap() {
//!     std::thread::sleep(POLL_INTERVAL);
//! }
//! assert_eq!(sim.progress(), 100);
//! assert_eq!(sim.particle(0).unwrap().trajectory().len(), 10);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `coulomb-core` | Vectors, fields, particles, constants, `ValidationError` |
//! | [`format`] | `coulomb-format` | Plain-text save/load format |
//! | [`engine`] | `coulomb-engine` | `Simulation`, background runs, progress |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core physical types (`coulomb-core`).
///
/// Contains [`types::Particle`], [`types::Field`], the plane-constrained
/// field inputs [`types::PlanarElectric`] and [`types::AxialMagnetic`],
/// and the Coulomb constant.
pub use coulomb_core as types;

/// Plain-text persistence (`coulomb-format`).
///
/// Stream documents with [`format::DocumentWriter`] and
/// [`format::DocumentReader`], or save and load against a directory
/// with [`format::files`].
pub use coulomb_format as format;

/// The simulation engine (`coulomb-engine`).
///
/// [`engine::Simulation`] owns the particles and runs the integrator on
/// a background worker.
pub use coulomb_engine as engine;

/// Common imports for typical Coulomb usage.
///
/// ```rust
/// use coulomb::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use coulomb_core::{
        AxialMagnetic, DVec3, Field, FieldKind, Particle, ParticleParams, PlanarElectric,
    };

    // Errors
    pub use coulomb_core::ValidationError;
    pub use coulomb_engine::{ConfigError, EngineError};
    pub use coulomb_format::FormatError;

    // Engine
    pub use coulomb_engine::{RunState, Simulation, SimulationConfig, POLL_INTERVAL};
}
