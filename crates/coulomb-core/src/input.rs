//! Free-text parameter parsing for editing front-ends.
//!
//! Form fields arrive as strings. Scalars are plain decimals; vectors
//! are written either bracketed (`"[1, 2, 3]"`) or bare (`"1,2,3"`).
//! Anything else is a [`ValidationError`].

use crate::error::{Quantity, ValidationError};
use crate::particle::ParticleParams;
use crate::vector::{from_components, DVec3};

/// Parse a single finite decimal.
pub fn parse_scalar(quantity: Quantity, input: &str) -> Result<f64, ValidationError> {
    let token = input.trim();
    let value: f64 = token.parse().map_err(|_| ValidationError::NotANumber {
        quantity,
        input: token.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { quantity, value });
    }
    Ok(value)
}

/// Parse a three-component vector, with or without surrounding brackets.
pub fn parse_vector(quantity: Quantity, input: &str) -> Result<DVec3, ValidationError> {
    let trimmed = input.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);
    if inner.trim().is_empty() {
        return Err(ValidationError::WrongArity { quantity, found: 0 });
    }
    let components = inner
        .split(',')
        .map(|part| parse_scalar(quantity, part))
        .collect::<Result<Vec<f64>, _>>()?;
    from_components(quantity, &components)
}

impl ParticleParams {
    /// Parse the four text inputs of a particle form.
    ///
    /// The result is a moving particle; the stationary flag is a
    /// separate toggle on the form.
    pub fn parse(
        mass: &str,
        charge: &str,
        position: &str,
        velocity: &str,
    ) -> Result<Self, ValidationError> {
        let params = Self::new(
            parse_scalar(Quantity::Mass, mass)?,
            parse_scalar(Quantity::Charge, charge)?,
            parse_vector(Quantity::Position, position)?,
            parse_vector(Quantity::Velocity, velocity)?,
        );
        params.validate()?;
        Ok(params)
    }
}
