//! Core types for the Coulomb charged-particle simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the physical data model shared by the codec and the engine:
//! vectors, external fields, particles, physical constants and the
//! [`ValidationError`] raised whenever a parameter is rejected.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod constants;
pub mod error;
pub mod field;
pub mod input;
pub mod particle;
pub mod vector;

pub use constants::{COULOMB_K, SOFTENING};
pub use error::{Quantity, ValidationError};
pub use field::{AxialMagnetic, Field, FieldKind, PlanarElectric};
pub use particle::{ChargeEnvironment, ChargeSource, Particle, ParticleParams};
pub use vector::DVec3;
