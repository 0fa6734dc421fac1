//! Vector helpers on top of [`glam::DVec3`].

pub use glam::DVec3;

use crate::error::{Quantity, ValidationError};

/// Check that every component of `v` is finite.
pub fn ensure_finite(quantity: Quantity, v: DVec3) -> Result<DVec3, ValidationError> {
    match v.to_array().into_iter().find(|c| !c.is_finite()) {
        Some(value) => Err(ValidationError::NonFinite { quantity, value }),
        None => Ok(v),
    }
}

/// Build a vector from a component slice that must hold exactly three
/// finite values.
pub fn from_components(quantity: Quantity, components: &[f64]) -> Result<DVec3, ValidationError> {
    match components {
        [x, y, z] => ensure_finite(quantity, DVec3::new(*x, *y, *z)),
        other => Err(ValidationError::WrongArity {
            quantity,
            found: other.len(),
        }),
    }
}
