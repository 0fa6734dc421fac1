//! Engine error type.

use std::error::Error;
use std::fmt;
use std::io;

use coulomb_core::ValidationError;
use coulomb_format::FormatError;

use crate::config::ConfigError;
use crate::simulation::RunState;

/// Errors returned by [`Simulation`](crate::Simulation) operations.
///
/// Every error is raised at the call that caused it and leaves the
/// simulation as it was, except for [`load`](crate::Simulation::load),
/// which clears the particle collection before reading.
#[derive(Debug)]
pub enum EngineError {
    /// A particle or field parameter was rejected.
    Validation(ValidationError),
    /// The time domain was rejected.
    Config(ConfigError),
    /// Saving or loading failed.
    Format(FormatError),
    /// A particle with identical parameters is already present.
    DuplicateParticle {
        /// Index of the existing particle.
        index: usize,
    },
    /// Another particle starts at the same position while interactions
    /// are enabled.
    Overlap {
        /// Index of the existing particle.
        index: usize,
    },
    /// A particle index is past the end of the collection.
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The collection length.
        len: usize,
    },
    /// No particle equal to the given one is in the collection.
    ParticleNotFound,
    /// The operation needs an idle simulation.
    NotIdle {
        /// The state the simulation was in.
        state: RunState,
    },
    /// The background worker thread could not be started.
    WorkerSpawnFailed(io::Error),
    /// The background worker panicked before delivering its results.
    WorkerPanicked,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "invalid parameter: {e}"),
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::Format(e) => write!(f, "persistence error: {e}"),
            Self::DuplicateParticle { index } => {
                write!(f, "particle already exists at index {index}")
            }
            Self::Overlap { index } => {
                write!(f, "particle overlaps the particle at index {index}")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "particle index {index} out of range for {len} particles")
            }
            Self::ParticleNotFound => write!(f, "particle not found"),
            Self::NotIdle { state } => write!(f, "simulation is {state}, not idle"),
            Self::WorkerSpawnFailed(e) => write!(f, "failed to start worker: {e}"),
            Self::WorkerPanicked => write!(f, "worker panicked"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Format(e) => Some(e),
            Self::WorkerSpawnFailed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for EngineError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<FormatError> for EngineError {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}
