//! Simulation time domain, run options, and configuration errors.
//!
//! [`SimulationConfig`] holds the total time, step size and interaction
//! flag. [`validate()`](SimulationConfig::validate) checks the time
//! domain; [`step_count()`](SimulationConfig::step_count) derives the
//! number of integration steps from it.

use std::error::Error;
use std::fmt;

// ── SimulationConfig ───────────────────────────────────────────────

/// Time domain and interaction switch of a simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Total simulated time in seconds. Must be positive and finite.
    pub time: f64,
    /// Integration step size in seconds. Must be positive and below `time`.
    pub precision: f64,
    /// Whether particles exert Coulomb forces on each other.
    pub interactions: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time: 10.0,
            precision: 0.01,
            interactions: true,
        }
    }
}

impl SimulationConfig {
    /// A configuration with interactions enabled.
    pub fn new(time: f64, precision: f64) -> Self {
        Self {
            time,
            precision,
            interactions: true,
        }
    }

    /// Set the interaction flag.
    pub fn interactions(mut self, interactions: bool) -> Self {
        self.interactions = interactions;
        self
    }

    /// Check the time domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.step_count().map(|_| ())
    }

    /// `round(time / precision)`, after validating the time domain.
    ///
    /// Always at least 1 for a valid configuration, since `precision < time`.
    pub fn step_count(&self) -> Result<usize, ConfigError> {
        if !(self.time.is_finite() && self.time > 0.0) {
            return Err(ConfigError::NonPositiveTime { value: self.time });
        }
        if !(self.precision.is_finite() && self.precision > 0.0) {
            return Err(ConfigError::NonPositivePrecision {
                value: self.precision,
            });
        }
        if self.precision >= self.time {
            return Err(ConfigError::PrecisionNotBelowTime {
                time: self.time,
                precision: self.precision,
            });
        }
        let steps = (self.time / self.precision).round();
        if !steps.is_finite() || steps >= usize::MAX as f64 {
            return Err(ConfigError::StepCountOverflow {
                time: self.time,
                precision: self.precision,
            });
        }
        Ok(steps as usize)
    }

    /// Step size in whole milliseconds, rounded.
    pub fn precision_millis(&self) -> u64 {
        (self.precision * 1000.0).round() as u64
    }
}

// ── RunOptions ─────────────────────────────────────────────────────

/// Options for the background worker of a run.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Name given to the worker thread. Default: `"coulomb-worker"`.
    pub worker_name: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            worker_name: "coulomb-worker".to_string(),
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`SimulationConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Total time is zero, negative, NaN or infinite.
    NonPositiveTime {
        /// The rejected value.
        value: f64,
    },
    /// Step size is zero, negative, NaN or infinite.
    NonPositivePrecision {
        /// The rejected value.
        value: f64,
    },
    /// Step size is not strictly below the total time.
    PrecisionNotBelowTime {
        /// Total time.
        time: f64,
        /// Step size.
        precision: f64,
    },
    /// `time / precision` does not fit in a step counter.
    StepCountOverflow {
        /// Total time.
        time: f64,
        /// Step size.
        precision: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveTime { value } => {
                write!(f, "time must be a positive number, got {value}")
            }
            Self::NonPositivePrecision { value } => {
                write!(f, "precision must be a positive number, got {value}")
            }
            Self::PrecisionNotBelowTime { time, precision } => write!(
                f,
                "precision ({precision}) must be smaller than time ({time})"
            ),
            Self::StepCountOverflow { time, precision } => write!(
                f,
                "time {time} at precision {precision} needs too many steps"
            ),
        }
    }
}

impl Error for ConfigError {}
