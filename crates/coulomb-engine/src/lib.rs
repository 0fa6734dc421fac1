//! Background integration engine for the Coulomb simulator.
//!
//! [`Simulation`] owns the particle collection, the two external fields
//! and the time domain. [`begin_calculations()`](Simulation::begin_calculations)
//! hands a copy of the particles to a single named worker thread that
//! runs a kick-drift-kick integrator over every step. Callers poll
//! [`progress()`](Simulation::progress) and
//! [`is_active()`](Simulation::is_active) without blocking, then
//! [`collect()`](Simulation::collect) or [`wait()`](Simulation::wait)
//! to install the finished trajectories.
//!
//! # Modules
//!
//! - [`config`]: time domain, run options, [`ConfigError`]
//! - [`simulation`]: [`Simulation`] and its [`RunState`] lifecycle
//! - [`progress`]: lock-free progress counter
//! - [`error`]: [`EngineError`]

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod progress;
pub mod simulation;
mod worker;

use std::time::Duration;

pub use config::{ConfigError, RunOptions, SimulationConfig};
pub use error::EngineError;
pub use progress::Progress;
pub use simulation::{RunState, Simulation};

/// Suggested interval between progress polls (about 40 Hz).
pub const POLL_INTERVAL: Duration = Duration::from_millis(25);
