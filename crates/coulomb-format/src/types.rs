//! Typed records of the persistence format.

use coulomb_core::{DVec3, ParticleParams};

/// Contents of the `SIMULATION` line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationHeader {
    /// Total simulated time (`T`).
    pub time: f64,
    /// Integration step size (`P`).
    pub precision: f64,
    /// Whether pairwise Coulomb interactions are enabled (`I`).
    pub interactions: bool,
}

/// Contents of the `FIELD` line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldsRecord {
    /// Electric field vector (`E`).
    pub electric: DVec3,
    /// Magnetic field vector (`M`).
    pub magnetic: DVec3,
}

/// One parsed line.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    /// A `SIMULATION` line.
    Simulation(SimulationHeader),
    /// A `FIELD` line.
    Fields(FieldsRecord),
    /// A `PARTICLE` line.
    Particle(ParticleParams),
}

/// A complete saved simulation.
///
/// # Examples
///
/// ```
/// use coulomb_core::{DVec3, ParticleParams};
/// use coulomb_format::{read_document, write_document, Document, FieldsRecord, SimulationHeader};
///
/// let doc = Document {
///     header: SimulationHeader { time: 1.0, precision: 0.1, interactions: true },
///     fields: FieldsRecord::default(),
///     particles: vec![ParticleParams::new(1.0, 1.0, DVec3::ZERO, DVec3::X)],
/// };
///
/// let mut buf = Vec::new();
/// write_document(&mut buf, &doc).unwrap();
/// let back = read_document(buf.as_slice()).unwrap();
/// assert_eq!(back, doc);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Time domain and interaction flag.
    pub header: SimulationHeader,
    /// External fields. Zero when the document has no `FIELD` line.
    pub fields: FieldsRecord,
    /// Particles in collection order.
    pub particles: Vec<ParticleParams>,
}
