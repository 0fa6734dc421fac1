//! Parameter validation errors.
//!
//! Every mutator on [`Particle`](crate::Particle) and
//! [`Field`](crate::Field) either applies fully or fails with a
//! [`ValidationError`] and leaves the value untouched.

use std::error::Error;
use std::fmt;

/// The physical quantity a rejected value was meant for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Particle mass.
    Mass,
    /// Particle charge.
    Charge,
    /// Initial particle position.
    Position,
    /// Initial particle velocity.
    Velocity,
    /// External electric field.
    ElectricField,
    /// External magnetic field.
    MagneticField,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mass => "mass",
            Self::Charge => "charge",
            Self::Position => "initial position",
            Self::Velocity => "initial velocity",
            Self::ElectricField => "electric field",
            Self::MagneticField => "magnetic field",
        };
        f.write_str(name)
    }
}

/// A parameter failed shape or sign validation.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationError {
    /// Mass was zero or negative.
    NonPositiveMass {
        /// The rejected mass.
        value: f64,
    },
    /// Charge was exactly zero.
    ZeroCharge,
    /// A component was NaN or infinite.
    NonFinite {
        /// Which quantity carried the value.
        quantity: Quantity,
        /// The offending value.
        value: f64,
    },
    /// A vector did not have exactly three components.
    WrongArity {
        /// Which quantity carried the vector.
        quantity: Quantity,
        /// Number of components supplied.
        found: usize,
    },
    /// Free-text input could not be read as a number.
    NotANumber {
        /// Which quantity the input was for.
        quantity: Quantity,
        /// The raw token that failed to parse.
        input: String,
    },
    /// A trajectory must hold at least one sample.
    ZeroSteps,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveMass { value } => {
                write!(f, "mass must be positive, got {value}")
            }
            Self::ZeroCharge => write!(f, "charge must be non-zero"),
            Self::NonFinite { quantity, value } => {
                write!(f, "{quantity} must be finite, got {value}")
            }
            Self::WrongArity { quantity, found } => {
                write!(f, "{quantity} must have 3 components, got {found}")
            }
            Self::NotANumber { quantity, input } => {
                write!(f, "{quantity} must be a number, got '{input}'")
            }
            Self::ZeroSteps => write!(f, "step count must be at least 1"),
        }
    }
}

impl Error for ValidationError {}
