//! Static external fields.
//!
//! A [`Field`] is a uniform vector tagged with its [`FieldKind`]. The
//! kind is fixed at construction; the vector may only be replaced whole.
//!
//! The engine models planar motion: the electric field lies in the XY
//! plane and the magnetic field points along Z. [`PlanarElectric`] and
//! [`AxialMagnetic`] carry exactly those degrees of freedom, so a field
//! built from them cannot violate the constraint.

use crate::error::{Quantity, ValidationError};
use crate::vector::{ensure_finite, DVec3};

/// Whether a field acts on charge directly or through velocity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Electric field `E`; contributes `q·E`.
    Electric,
    /// Magnetic field `B`; contributes the Lorentz term `q·(v × B)`.
    Magnetic,
}

impl FieldKind {
    fn quantity(self) -> Quantity {
        match self {
            Self::Electric => Quantity::ElectricField,
            Self::Magnetic => Quantity::MagneticField,
        }
    }
}

/// A uniform static field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    vector: DVec3,
    kind: FieldKind,
}

impl Field {
    /// Create a field, rejecting non-finite components.
    pub fn new(kind: FieldKind, vector: DVec3) -> Result<Self, ValidationError> {
        let vector = ensure_finite(kind.quantity(), vector)?;
        Ok(Self { vector, kind })
    }

    /// A zero field of the given kind.
    pub fn zero(kind: FieldKind) -> Self {
        Self {
            vector: DVec3::ZERO,
            kind,
        }
    }

    /// The field vector.
    pub fn vector(&self) -> DVec3 {
        self.vector
    }

    /// Replace the vector wholesale. The kind is unchanged.
    pub fn set_vector(&mut self, vector: DVec3) -> Result<(), ValidationError> {
        self.vector = ensure_finite(self.kind.quantity(), vector)?;
        Ok(())
    }

    /// The kind tag.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// `true` iff the Euclidean norm is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.vector.length() == 0.0
    }

    /// `true` for an electric field.
    pub fn is_electric(&self) -> bool {
        self.kind == FieldKind::Electric
    }

    /// `true` for a magnetic field.
    pub fn is_magnetic(&self) -> bool {
        self.kind == FieldKind::Magnetic
    }
}

/// An electric field confined to the XY plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanarElectric {
    x: f64,
    y: f64,
}

impl PlanarElectric {
    /// Create a planar electric field from its X and Y components.
    pub fn new(x: f64, y: f64) -> Result<Self, ValidationError> {
        ensure_finite(Quantity::ElectricField, DVec3::new(x, y, 0.0))?;
        Ok(Self { x, y })
    }

    /// X component.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y component.
    pub fn y(&self) -> f64 {
        self.y
    }
}

impl From<PlanarElectric> for Field {
    fn from(e: PlanarElectric) -> Self {
        Self {
            vector: DVec3::new(e.x, e.y, 0.0),
            kind: FieldKind::Electric,
        }
    }
}

/// A magnetic field along the Z axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxialMagnetic {
    z: f64,
}

impl AxialMagnetic {
    /// Create an axial magnetic field from its Z component.
    pub fn new(z: f64) -> Result<Self, ValidationError> {
        ensure_finite(Quantity::MagneticField, DVec3::new(0.0, 0.0, z))?;
        Ok(Self { z })
    }

    /// Z component.
    pub fn z(&self) -> f64 {
        self.z
    }
}

impl From<AxialMagnetic> for Field {
    fn from(b: AxialMagnetic) -> Self {
        Self {
            vector: DVec3::new(0.0, 0.0, b.z),
            kind: FieldKind::Magnetic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_field_is_zero() {
        assert!(Field::zero(FieldKind::Electric).is_zero());
        assert!(Field::zero(FieldKind::Magnetic).is_magnetic());
    }

    #[test]
    fn set_vector_keeps_kind() {
        let mut field = Field::zero(FieldKind::Magnetic);
        field.set_vector(DVec3::new(1.0, 2.0, 3.0)).unwrap();
        assert!(field.is_magnetic());
        assert!(!field.is_zero());
        assert_eq!(field.vector(), DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn set_vector_rejects_infinite_and_keeps_old_value() {
        let mut field = Field::new(FieldKind::Electric, DVec3::X).unwrap();
        let err = field.set_vector(DVec3::new(f64::INFINITY, 0.0, 0.0));
        assert!(matches!(
            err,
            Err(ValidationError::NonFinite {
                quantity: Quantity::ElectricField,
                ..
            })
        ));
        assert_eq!(field.vector(), DVec3::X);
    }

    #[test]
    fn planar_electric_has_no_z() {
        let field: Field = PlanarElectric::new(3.0, -4.0).unwrap().into();
        assert_eq!(field.vector(), DVec3::new(3.0, -4.0, 0.0));
        assert!(field.is_electric());
    }

    #[test]
    fn axial_magnetic_only_z() {
        let field: Field = AxialMagnetic::new(0.5).unwrap().into();
        assert_eq!(field.vector(), DVec3::new(0.0, 0.0, 0.5));
        assert!(field.is_magnetic());
    }

    #[test]
    fn axial_magnetic_rejects_nan() {
        assert!(AxialMagnetic::new(f64::NAN).is_err());
    }
}
